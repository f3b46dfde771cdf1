use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Discrete sentiment classes produced by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Tolerant parse for labels read back from storage or a remote model.
    pub fn from_text(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

/// One classifier verdict for one unit of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Persisted classification outcome. One row per analyzed unit — a single
/// text, or one aggregated post batch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SentimentResult {
    pub id: uuid::Uuid,
    pub symbol: String,
    pub sentiment: String,
    pub confidence: f64,
    pub source_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SentimentResult {
    pub fn new(
        symbol: String,
        label: SentimentLabel,
        confidence: f64,
        source_text: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            symbol,
            sentiment: label.as_str().to_string(),
            confidence,
            source_text,
            created_at: Utc::now(),
        }
    }
}

/// Percentage breakdown of a batch of classifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SentimentSummary {
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
}

/// The winning label and its share expressed as a confidence in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OverallSentiment {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Reduction of a classification batch. `overall` is None when the batch
/// was empty — a "no data" verdict, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSentiment {
    pub summary: SentimentSummary,
    pub overall: Option<OverallSentiment>,
}

/// Day-level aggregation of persisted sentiment rows for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentTrendBucket {
    pub date: NaiveDate,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub neutral_pct: f64,
    pub total_analyzed: i64,
}

#[derive(Debug, Deserialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TextAnalysis {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

/// Per-post verdict echoed back in the analyze-posts response.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedPost {
    pub text: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct SymbolSentiment {
    pub symbol: String,
    pub sentiment_summary: SentimentSummary,
    pub total_analyzed: i64,
    pub overall: Option<OverallSentiment>,
    pub detailed_sentiments: Vec<AnalyzedPost>,
}

#[derive(Debug, Serialize)]
pub struct SentimentTrend {
    pub symbol: String,
    pub days_analyzed: i64,
    pub sentiment_trends: Vec<SentimentTrendBucket>,
}
