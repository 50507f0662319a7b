//! Social media mention fetchers.
//!
//! Each platform returns the raw post texts for a ticker; the shared
//! [`sentiment_analysis::KeywordClassifier`] turns them into a
//! [`analysis_core::SocialSignal`].

pub mod reddit;
pub mod twitter;

pub use reddit::{RedditClient, RedditConfig};
pub use twitter::{TwitterClient, TwitterConfig};

/// Posts requested per search
pub const SEARCH_LIMIT: u32 = 50;
