use analysis_core::{NewsItem, NewsSource, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const GOOGLE_NEWS_RSS_URL: &str = "https://news.google.com/rss/search";

/// Headline fetcher backed by the Google News search feed
pub struct GoogleNewsFeed {
    http_client: Client,
    search_url: String,
}

impl GoogleNewsFeed {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_search_url(GOOGLE_NEWS_RSS_URL)
    }

    pub fn with_search_url(search_url: impl Into<String>) -> Result<Self, SourceError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            search_url: search_url.into(),
        })
    }

    /// Fetch headlines for a symbol, in feed order
    pub async fn fetch(&self, symbol: &str) -> Result<Vec<NewsItem>, SourceError> {
        let response = self
            .http_client
            .get(&self.search_url)
            .query(&[("q", symbol), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
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

        let items = parse_rss(&body)?;
        tracing::debug!(symbol, count = items.len(), "Fetched news feed");
        Ok(items)
    }
}

#[async_trait]
impl NewsSource for GoogleNewsFeed {
    async fn headlines(&self, ticker: &str) -> Result<Vec<NewsItem>, SourceError> {
        self.fetch(ticker).await
    }
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Parse an RSS 2.0 document into headlines. Items without a title are dropped.
pub fn parse_rss(xml: &str) -> Result<Vec<NewsItem>, SourceError> {
    let rss: Rss = quick_xml::de::from_str(xml).map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(rss
        .channel
        .items
        .into_iter()
        .filter_map(|item| {
            let title = item.title?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(NewsItem {
                title,
                published: item.pub_date.as_deref().and_then(parse_pub_date),
                link: item.link.unwrap_or_default(),
            })
        })
        .collect())
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
