use analysis_core::{SocialPlatform, SocialSignal, SocialSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use sentiment_analysis::KeywordClassifier;
use serde::Deserialize;
use std::time::Duration;

use crate::SEARCH_LIMIT;

const RECENT_SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Twitter/X API v2 app credentials
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub bearer_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

/// Searches the recent-tweets endpoint.
pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    classifier: KeywordClassifier,
}

impl TwitterClient {
    pub fn new(config: &TwitterConfig) -> Result<Self, SourceError> {
        if config.bearer_token.is_empty() {
            return Err(SourceError::Config("Twitter bearer token not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            bearer_token: config.bearer_token.clone(),
            classifier: KeywordClassifier::new(),
        })
    }

    /// Texts of recent tweets mentioning `symbol`
    pub async fn search_tweets(&self, symbol: &str) -> Result<Vec<String>, SourceError> {
        let max_results = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(RECENT_SEARCH_URL)
            .bearer_auth(&self.bearer_token)
            .query(&[("query", symbol), ("max_results", max_results.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;
        parse_search(&body)
    }
}

#[async_trait]
impl SocialSource for TwitterClient {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::Twitter
    }

    async fn signal(&self, ticker: &str) -> Result<SocialSignal, SourceError> {
        let tweets = self.search_tweets(ticker).await?;
        Ok(self.classifier.tally(tweets.iter().map(String::as_str)))
    }
}

/// Parse a recent-search payload into tweet texts. No `data` means no tweets.
pub fn parse_search(body: &str) -> Result<Vec<String>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    Ok(response.data.into_iter().map(|t| t.text).collect())
}
