use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Classification, SentimentLabel};

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;

    async fn classify_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<Classification>, ClassifierError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.classify(text).await?);
        }
        Ok(out)
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "up", "gain", "gains", "bull", "bullish", "rally", "surge", "soar", "soars",
    "beat", "beats", "strong", "growth", "profit", "profits", "upgrade",
    "outperform", "buy", "record", "win", "winning", "rebound",
];

const NEGATIVE_WORDS: &[&str] = &[
    "down", "loss", "losses", "bear", "bearish", "crash", "plunge", "plunges",
    "drop", "drops", "miss", "misses", "weak", "decline", "sell", "selloff",
    "downgrade", "underperform", "short", "fear", "slump", "cut",
];

/// Lexicon-based classifier. Deterministic and dependency-free, used as the
/// default so the service works without any model endpoint.
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn score(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();
        let mut positive = 0usize;
        let mut negative = 0usize;

        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            if POSITIVE_WORDS.contains(&word) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word) {
                negative += 1;
            }
        }

        let total = positive + negative;
        if total == 0 || positive == negative {
            return Classification {
                label: SentimentLabel::Neutral,
                confidence: 0.5,
            };
        }

        let (label, winner) = if positive > negative {
            (SentimentLabel::Positive, positive)
        } else {
            (SentimentLabel::Negative, negative)
        };

        // Margin of the winning side scales confidence from 0.5 up to 1.0.
        let margin = (winner * 2 - total) as f64 / total as f64;
        Classification {
            label,
            confidence: 0.5 + 0.5 * margin,
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        Ok(self.score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text_scores_positive() {
        let classifier = KeywordClassifier::new();
        let result = classifier.score("Shares rally as earnings beat expectations");

        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_negative_text_scores_negative() {
        let classifier = KeywordClassifier::new();
        let result = classifier.score("Stock plunges after the company misses guidance");

        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_text_without_lexicon_hits_is_neutral() {
        let classifier = KeywordClassifier::new();
        let result = classifier.score("The exchange was open for trading today");

        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_balanced_text_is_neutral() {
        let classifier = KeywordClassifier::new();
        let result = classifier.score("gains offset by losses");

        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_unanimous_text_has_full_confidence() {
        let classifier = KeywordClassifier::new();
        let result = classifier.score("surge rally beat strong growth");

        assert_eq!(result.label, SentimentLabel::Positive);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }
}
