use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::external::post_source::{Post, PostSource, PostSourceError};

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

pub struct TwitterPostSource {
    client: Client,
    bearer_token: String,
}

impl TwitterPostSource {
    pub fn new(bearer_token: String) -> Self {
        Self {
            client: Client::new(),
            bearer_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<Vec<Tweet>>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
    created_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl PostSource for TwitterPostSource {
    async fn recent_posts(&self, symbol: &str, count: u32) -> Result<Vec<Post>, PostSourceError> {
        let query = format!("${symbol} OR {symbol} stock -is:retweet lang:en");
        // The recent-search endpoint only accepts 10..=100 results per page.
        let max_results = count.clamp(10, 100).to_string();

        let response = self.client
            .get(SEARCH_URL)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query.as_str()),
                ("max_results", max_results.as_str()),
                ("tweet.fields", "created_at"),
            ])
            .send()
            .await
            .map_err(|e| PostSourceError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PostSourceError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PostSourceError::BadResponse(format!(
                "search returned {}: {}",
                status, error_text
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PostSourceError::BadResponse(e.to_string()))?;

        let mut posts: Vec<Post> = body
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|tweet| Post {
                text: tweet.text,
                created_at: tweet.created_at,
            })
            .collect();
        // The page floor is 10, so a smaller count is trimmed here.
        posts.truncate(count as usize);

        info!("Fetched {} posts for {}", posts.len(), symbol);
        Ok(posts)
    }
}
