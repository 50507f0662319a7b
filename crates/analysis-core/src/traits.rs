use async_trait::async_trait;
use crate::{Bar, FilingSet, NewsItem, SocialPlatform, SocialSignal, SourceError};

/// Source of daily price history
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for `ticker`, oldest first.
    async fn daily_bars(&self, ticker: &str) -> Result<Vec<Bar>, SourceError>;
}

/// Source of recent headlines
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Headlines in feed order.
    async fn headlines(&self, ticker: &str) -> Result<Vec<NewsItem>, SourceError>;
}

/// Source of social media mentions for one platform
#[async_trait]
pub trait SocialSource: Send + Sync {
    fn platform(&self) -> SocialPlatform;

    async fn signal(&self, ticker: &str) -> Result<SocialSignal, SourceError>;
}

/// Source of the per-run regulatory filing set
#[async_trait]
pub trait FilingSource: Send + Sync {
    async fn recent_filers(&self) -> Result<FilingSet, SourceError>;
}

/// Scores a batch of headlines with a language model
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Sentiment in [-5, 5]; positive is bullish.
    async fn score_headlines(&self, ticker: &str, headlines: &[NewsItem]) -> Result<f64, SourceError>;
}
