use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

use crate::external::classifier::{ClassifierError, SentimentClassifier};
use crate::models::{Classification, SentimentLabel};

const FINBERT_URL: &str = "https://api-inference.huggingface.co/models/ProsusAI/finbert";

/// FinBERT classifier behind the Hugging Face inference API.
pub struct FinbertClassifier {
    client: Client,
    api_token: String,
}

impl FinbertClassifier {
    pub fn new(api_token: String) -> Self {
        Self {
            client: Client::new(),
            api_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[async_trait]
impl SentimentClassifier for FinbertClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let mut batch = self.classify_batch(&[text.to_string()]).await?;
        batch.pop().ok_or_else(|| {
            ClassifierError::BadResponse("empty classification result".to_string())
        })
    }

    async fn classify_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Classification>, ClassifierError> {
        let request_body = serde_json::json!({ "inputs": texts });

        let response = self.client
            .post(FINBERT_URL)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!("FinBERT request failed: {}", e);
                ClassifierError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("FinBERT API error {}: {}", status, error_text);
            return Err(ClassifierError::BadResponse(format!(
                "classifier returned {}: {}",
                status, error_text
            )));
        }

        // One inner list of label scores per input text.
        let scored: Vec<Vec<LabelScore>> = response.json().await.map_err(|e| {
            error!("Failed to parse FinBERT response: {}", e);
            ClassifierError::BadResponse(e.to_string())
        })?;

        scored
            .into_iter()
            .map(|labels| {
                labels
                    .into_iter()
                    .max_by(|a, b| {
                        a.score
                            .partial_cmp(&b.score)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|best| Classification {
                        label: SentimentLabel::from_text(&best.label),
                        confidence: best.score,
                    })
                    .ok_or_else(|| {
                        ClassifierError::BadResponse("empty classification result".to_string())
                    })
            })
            .collect()
    }
}
