use analysis_core::{SocialPlatform, SocialSignal, SocialSource, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use sentiment_analysis::KeywordClassifier;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::SEARCH_LIMIT;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_URL: &str = "https://oauth.reddit.com";

/// Reddit script-app credentials
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
}

/// Searches recent Reddit posts with app-only OAuth.
pub struct RedditClient {
    client: Client,
    config: RedditConfig,
    classifier: KeywordClassifier,
    /// App-only token, fetched on first use and kept for the run.
    token: OnceCell<String>,
}

impl RedditClient {
    pub fn new(config: &RedditConfig) -> Result<Self, SourceError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(SourceError::Config("Reddit client id/secret not set".to_string()));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            classifier: KeywordClassifier::new(),
            token: OnceCell::new(),
        })
    }

    async fn access_token(&self) -> Result<&str, SourceError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let response = self
                    .client
                    .post(TOKEN_URL)
                    .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
                    .form(&[("grant_type", "client_credentials")])
                    .send()
                    .await
                    .map_err(|e| SourceError::Http(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(SourceError::Status {
                        status: response.status().as_u16(),
                        body: response.text().await.unwrap_or_default(),
                    });
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| SourceError::Parse(e.to_string()))?;
                tracing::debug!("Obtained Reddit access token");
                Ok(token.access_token)
            })
            .await?;

        Ok(token.as_str())
    }

    /// Texts (title + body) of posts from the last day mentioning `symbol`
    pub async fn search_posts(&self, symbol: &str) -> Result<Vec<String>, SourceError> {
        let token = self.access_token().await?;
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(format!("{}/search", API_URL))
            .bearer_auth(token)
            .query(&[
                ("q", symbol),
                ("sort", "new"),
                ("t", "day"),
                ("limit", limit.as_str()),
            ])
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
        parse_listing(&body)
    }
}

#[async_trait]
impl SocialSource for RedditClient {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::Reddit
    }

    async fn signal(&self, ticker: &str) -> Result<SocialSignal, SourceError> {
        let posts = self.search_posts(ticker).await?;
        Ok(self.classifier.tally(posts.iter().map(String::as_str)))
    }
}

/// Parse a search listing into post texts.
pub fn parse_listing(body: &str) -> Result<Vec<String>, SourceError> {
    let listing: Listing = serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(listing
        .data
        .children
        .into_iter()
        .map(|c| {
            if c.data.selftext.is_empty() {
                c.data.title
            } else {
                format!("{} {}", c.data.title, c.data.selftext)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_FIXTURE: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [
                {"kind": "t3", "data": {"title": "TSLA to the moon", "selftext": "", "subreddit": "wallstreetbets"}},
                {"kind": "t3", "data": {"title": "Thoughts on TSLA?", "selftext": "Looks overvalued to me", "subreddit": "stocks"}},
                {"kind": "t3", "data": {"title": "TSLA delivery numbers", "subreddit": "investing"}}
            ]
        }
    }"#;

    #[test]
    fn test_parse_listing_joins_title_and_body() {
        let posts = parse_listing(LISTING_FIXTURE).unwrap();

        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0], "TSLA to the moon");
        assert_eq!(posts[1], "Thoughts on TSLA? Looks overvalued to me");
    }

    #[test]
    fn test_listing_tally() {
        let posts = parse_listing(LISTING_FIXTURE).unwrap();
        let signal = KeywordClassifier::new().tally(posts.iter().map(String::as_str));

        assert_eq!(signal.mentions, 3);
        assert_eq!(signal.sentiment, 0);
    }

    #[test]
    fn test_parse_listing_empty() {
        let posts = parse_listing(r#"{"kind":"Listing","data":{"children":[]}}"#).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = RedditConfig {
            client_id: String::new(),
            client_secret: "secret".to_string(),
            user_agent: "test".to_string(),
        };
        assert!(matches!(RedditClient::new(&config), Err(SourceError::Config(_))));
    }
}
