use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::db;
use crate::errors::AppError;
use crate::external::classifier::SentimentClassifier;
use crate::external::post_source::PostSource;
use crate::models::{
    AnalyzedPost, BatchSentiment, Classification, OverallSentiment, SentimentLabel,
    SentimentResult, SentimentSummary, SentimentTrend, SentimentTrendBucket, SymbolSentiment,
    TextAnalysis,
};
use crate::services::asset_service;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// First $-prefixed token, e.g. "$AAPL beats estimates" -> AAPL.
fn extract_ticker(text: &str) -> Option<String> {
    let pattern = Regex::new(r"\$([A-Za-z0-9.]{1,20})").unwrap();
    pattern.captures(text).map(|c| c[1].to_uppercase())
}

/// Reduces a batch of classifications to percentage shares plus an overall
/// verdict. An empty batch means "no data": zero percentages and no overall
/// label, never an error.
pub fn aggregate_batch(classifications: &[Classification]) -> BatchSentiment {
    if classifications.is_empty() {
        return BatchSentiment {
            summary: SentimentSummary::default(),
            overall: None,
        };
    }

    let total = classifications.len() as f64;
    let mut positive = 0usize;
    let mut negative = 0usize;
    for c in classifications {
        match c.label {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => {}
        }
    }
    let neutral = classifications.len() - positive - negative;

    let summary = SentimentSummary {
        positive_pct: round2(positive as f64 / total * 100.0),
        negative_pct: round2(negative as f64 / total * 100.0),
        neutral_pct: round2(neutral as f64 / total * 100.0),
    };

    // Ties resolve positive over neutral over negative so repeated runs on
    // the same batch always agree.
    let mut label = SentimentLabel::Positive;
    let mut best = summary.positive_pct;
    for (candidate, pct) in [
        (SentimentLabel::Neutral, summary.neutral_pct),
        (SentimentLabel::Negative, summary.negative_pct),
    ] {
        if pct > best {
            label = candidate;
            best = pct;
        }
    }

    BatchSentiment {
        summary,
        overall: Some(OverallSentiment {
            label,
            confidence: best / 100.0,
        }),
    }
}

/// Buckets stored results by UTC calendar day, ascending. Results older than
/// `since` are skipped; days with no results in range produce no bucket.
pub fn trend_by_day(
    results: &[SentimentResult],
    since: DateTime<Utc>,
) -> Vec<SentimentTrendBucket> {
    let mut days: BTreeMap<NaiveDate, (i64, i64, i64)> = BTreeMap::new();

    for result in results {
        if result.created_at < since {
            continue;
        }
        let counts = days
            .entry(result.created_at.date_naive())
            .or_insert((0, 0, 0));
        match SentimentLabel::from_text(&result.sentiment) {
            SentimentLabel::Positive => counts.0 += 1,
            SentimentLabel::Negative => counts.1 += 1,
            SentimentLabel::Neutral => counts.2 += 1,
        }
    }

    days.into_iter()
        .map(|(date, (positive, negative, neutral))| {
            let total = positive + negative + neutral;
            SentimentTrendBucket {
                date,
                positive_pct: round2(positive as f64 / total as f64 * 100.0),
                negative_pct: round2(negative as f64 / total as f64 * 100.0),
                neutral_pct: round2(neutral as f64 / total as f64 * 100.0),
                total_analyzed: total,
            }
        })
        .collect()
}

/// Classifies one free-form text. When the text names a `$TICKER`, the
/// verdict is also stored under that symbol for the trend surface.
pub async fn analyze_text(
    pool: &PgPool,
    classifier: &Arc<dyn SentimentClassifier>,
    input: &str,
) -> Result<TextAnalysis, AppError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Text cannot be empty".into()));
    }

    let classification = classifier.classify(text).await.map_err(|e| {
        error!("Sentiment classification failed: {}", e);
        AppError::Unavailable("Sentiment classifier is not available".into())
    })?;

    if let Some(symbol) = extract_ticker(text) {
        let row = SentimentResult::new(
            symbol,
            classification.label,
            classification.confidence,
            Some(text.to_string()),
        );
        // Persistence is best-effort; the caller still gets the verdict.
        if let Err(e) = db::sentiment_queries::insert(pool, row).await {
            warn!("Could not store sentiment result: {}", e);
        }
    }

    Ok(TextAnalysis {
        sentiment: classification.label,
        confidence: classification.confidence,
    })
}

/// Fetches recent posts mentioning a ticker, classifies them and reduces the
/// batch. A failing or empty post fetch degrades to a "no data" result; only
/// a missing source or a dead classifier surface as Unavailable.
pub async fn analyze_symbol_posts(
    pool: &PgPool,
    classifier: &Arc<dyn SentimentClassifier>,
    posts: Option<&Arc<dyn PostSource>>,
    symbol: &str,
    count: u32,
) -> Result<SymbolSentiment, AppError> {
    let symbol = asset_service::normalize_symbol(symbol)?;
    if !(1..=100).contains(&count) {
        return Err(AppError::Validation(
            "count must be between 1 and 100".into(),
        ));
    }

    let Some(source) = posts else {
        return Err(AppError::Unavailable(
            "Social post source is not configured".into(),
        ));
    };

    let fetched = match source.recent_posts(&symbol, count).await {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Post fetch failed for {}: {}", symbol, e);
            Vec::new()
        }
    };

    if fetched.is_empty() {
        info!("No posts found for {}", symbol);
        return Ok(SymbolSentiment {
            symbol,
            sentiment_summary: SentimentSummary::default(),
            total_analyzed: 0,
            overall: None,
            detailed_sentiments: Vec::new(),
        });
    }

    let texts: Vec<String> = fetched.into_iter().map(|p| p.text).collect();
    let classifications = classifier.classify_batch(&texts).await.map_err(|e| {
        error!("Sentiment classification failed: {}", e);
        AppError::Unavailable("Sentiment classifier is not available".into())
    })?;

    let total_analyzed = classifications.len() as i64;
    let batch = aggregate_batch(&classifications);

    if let Some(overall) = &batch.overall {
        let row = SentimentResult::new(
            symbol.clone(),
            overall.label,
            overall.confidence,
            Some(format!("Aggregated from {} posts", total_analyzed)),
        );
        if let Err(e) = db::sentiment_queries::insert(pool, row).await {
            warn!("Could not store aggregated sentiment for {}: {}", symbol, e);
        }
    }

    let detailed_sentiments = texts
        .into_iter()
        .zip(classifications.iter())
        .map(|(text, c)| AnalyzedPost {
            text,
            sentiment: c.label,
            confidence: c.confidence,
        })
        .collect();

    Ok(SymbolSentiment {
        symbol,
        sentiment_summary: batch.summary,
        total_analyzed,
        overall: batch.overall,
        detailed_sentiments,
    })
}

pub async fn trend(pool: &PgPool, symbol: &str, days: i64) -> Result<SentimentTrend, AppError> {
    let symbol = asset_service::normalize_symbol(symbol)?;
    if !(1..=30).contains(&days) {
        return Err(AppError::Validation("days must be between 1 and 30".into()));
    }

    let since = Utc::now() - Duration::days(days);
    let results = db::sentiment_queries::fetch_since(pool, &symbol, since).await?;
    let sentiment_trends = trend_by_day(&results, since);

    Ok(SentimentTrend {
        symbol,
        days_analyzed: days,
        sentiment_trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn verdict(label: SentimentLabel) -> Classification {
        Classification {
            label,
            confidence: 0.8,
        }
    }

    fn stored(label: SentimentLabel, at: DateTime<Utc>) -> SentimentResult {
        SentimentResult {
            id: uuid::Uuid::new_v4(),
            symbol: "AAPL".to_string(),
            sentiment: label.as_str().to_string(),
            confidence: 0.9,
            source_text: None,
            created_at: at,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_batch_is_no_data_not_an_error() {
        let batch = aggregate_batch(&[]);

        assert_eq!(batch.summary.positive_pct, 0.0);
        assert_eq!(batch.summary.negative_pct, 0.0);
        assert_eq!(batch.summary.neutral_pct, 0.0);
        assert!(batch.overall.is_none());
    }

    #[test]
    fn test_percentages_round_to_two_decimals() {
        let batch = aggregate_batch(&[
            verdict(SentimentLabel::Positive),
            verdict(SentimentLabel::Neutral),
            verdict(SentimentLabel::Neutral),
        ]);

        assert_eq!(batch.summary.positive_pct, 33.33);
        assert_eq!(batch.summary.neutral_pct, 66.67);
        assert_eq!(batch.summary.negative_pct, 0.0);
    }

    #[test]
    fn test_three_way_tie_resolves_positive() {
        let batch = aggregate_batch(&[
            verdict(SentimentLabel::Positive),
            verdict(SentimentLabel::Negative),
            verdict(SentimentLabel::Neutral),
        ]);

        let overall = batch.overall.unwrap();
        assert_eq!(overall.label, SentimentLabel::Positive);
        assert!((overall.confidence - 0.3333).abs() < 1e-4);
    }

    #[test]
    fn test_overall_confidence_is_winning_share() {
        let batch = aggregate_batch(&[
            verdict(SentimentLabel::Negative),
            verdict(SentimentLabel::Negative),
            verdict(SentimentLabel::Negative),
            verdict(SentimentLabel::Positive),
        ]);

        let overall = batch.overall.unwrap();
        assert_eq!(overall.label, SentimentLabel::Negative);
        assert!((overall.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_beats_negative_on_ties() {
        let batch = aggregate_batch(&[
            verdict(SentimentLabel::Neutral),
            verdict(SentimentLabel::Negative),
        ]);

        assert_eq!(batch.overall.unwrap().label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_trend_groups_by_utc_calendar_day() {
        let results = vec![
            stored(SentimentLabel::Positive, at(2024, 1, 1, 1)),
            stored(SentimentLabel::Negative, at(2024, 1, 1, 23)),
            stored(SentimentLabel::Positive, at(2024, 1, 3, 12)),
        ];

        let buckets = trend_by_day(&results, at(2024, 1, 1, 0));

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].date, at(2024, 1, 1, 0).date_naive());
        assert_eq!(buckets[0].total_analyzed, 2);
        assert_eq!(buckets[0].positive_pct, 50.0);
        assert_eq!(buckets[0].negative_pct, 50.0);
        // Jan 2 has no results, so there is no bucket for it.
        assert_eq!(buckets[1].date, at(2024, 1, 3, 0).date_naive());
        assert_eq!(buckets[1].total_analyzed, 1);
    }

    #[test]
    fn test_trend_filters_results_before_since() {
        let results = vec![
            stored(SentimentLabel::Positive, at(2023, 12, 25, 9)),
            stored(SentimentLabel::Neutral, at(2024, 1, 2, 9)),
        ];

        let buckets = trend_by_day(&results, at(2024, 1, 1, 0));

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, at(2024, 1, 2, 0).date_naive());
        assert_eq!(buckets[0].neutral_pct, 100.0);
    }

    #[test]
    fn test_trend_buckets_sort_ascending() {
        let results = vec![
            stored(SentimentLabel::Positive, at(2024, 1, 5, 9)),
            stored(SentimentLabel::Positive, at(2024, 1, 2, 9)),
            stored(SentimentLabel::Positive, at(2024, 1, 4, 9)),
        ];

        let buckets = trend_by_day(&results, at(2024, 1, 1, 0));

        let dates: Vec<NaiveDate> = buckets.iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_extract_ticker_takes_first_dollar_token() {
        assert_eq!(extract_ticker("$AAPL beats, $MSFT next"), Some("AAPL".to_string()));
        assert_eq!(extract_ticker("buy $brk.b today"), Some("BRK.B".to_string()));
        assert_eq!(extract_ticker("no tickers here"), None);
    }
}
