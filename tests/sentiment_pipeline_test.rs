/// Sentiment pipeline exercised without a database: classifier verdicts
/// reduced to batch percentages, and stored rows bucketed into daily trend
/// points.
use chrono::{DateTime, TimeZone, Utc};

use wealthpulse_backend::external::classifier::{KeywordClassifier, SentimentClassifier};
use wealthpulse_backend::models::{SentimentLabel, SentimentResult};
use wealthpulse_backend::services::sentiment_service::{aggregate_batch, trend_by_day};

fn stored(label: SentimentLabel, at: DateTime<Utc>) -> SentimentResult {
    SentimentResult {
        id: uuid::Uuid::new_v4(),
        symbol: "TSLA".to_string(),
        sentiment: label.as_str().to_string(),
        confidence: 0.8,
        source_text: None,
        created_at: at,
    }
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Classification feeding aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_classified_posts_reduce_to_percentages() {
    let classifier = KeywordClassifier::new();
    let texts = vec![
        "Shares surge after record profits".to_string(),
        "Stock plunges on weak guidance".to_string(),
        "The company filed its quarterly report".to_string(),
        "Analysts upgrade on strong growth".to_string(),
    ];

    let verdicts = classifier.classify_batch(&texts).await.unwrap();
    let batch = aggregate_batch(&verdicts);

    assert_eq!(batch.summary.positive_pct, 50.0);
    assert_eq!(batch.summary.negative_pct, 25.0);
    assert_eq!(batch.summary.neutral_pct, 25.0);

    let overall = batch.overall.unwrap();
    assert_eq!(overall.label, SentimentLabel::Positive);
    assert!((overall.confidence - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_no_posts_means_no_verdict() {
    let classifier = KeywordClassifier::new();

    let verdicts = classifier.classify_batch(&[]).await.unwrap();
    let batch = aggregate_batch(&verdicts);

    assert_eq!(batch.summary.positive_pct, 0.0);
    assert_eq!(batch.summary.negative_pct, 0.0);
    assert_eq!(batch.summary.neutral_pct, 0.0);
    assert!(batch.overall.is_none());
}

// ---------------------------------------------------------------------------
// Daily trend bucketing
// ---------------------------------------------------------------------------

#[test]
fn test_results_bucket_by_utc_day_and_skip_quiet_days() {
    let results = vec![
        stored(SentimentLabel::Positive, at(2024, 3, 1, 0)),
        stored(SentimentLabel::Positive, at(2024, 3, 1, 23)),
        stored(SentimentLabel::Negative, at(2024, 3, 1, 12)),
        // Nothing on March 2nd.
        stored(SentimentLabel::Neutral, at(2024, 3, 3, 8)),
    ];

    let buckets = trend_by_day(&results, at(2024, 3, 1, 0));

    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0].date, at(2024, 3, 1, 0).date_naive());
    assert_eq!(buckets[0].total_analyzed, 3);
    assert_eq!(buckets[0].positive_pct, 66.67);
    assert_eq!(buckets[0].negative_pct, 33.33);
    assert_eq!(buckets[0].neutral_pct, 0.0);

    assert_eq!(buckets[1].date, at(2024, 3, 3, 0).date_naive());
    assert_eq!(buckets[1].total_analyzed, 1);
    assert_eq!(buckets[1].neutral_pct, 100.0);
}

#[test]
fn test_results_before_the_window_are_ignored() {
    let results = vec![
        stored(SentimentLabel::Negative, at(2024, 2, 20, 10)),
        stored(SentimentLabel::Positive, at(2024, 3, 2, 10)),
    ];

    let buckets = trend_by_day(&results, at(2024, 3, 1, 0));

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].date, at(2024, 3, 2, 0).date_naive());
    assert_eq!(buckets[0].positive_pct, 100.0);
}
