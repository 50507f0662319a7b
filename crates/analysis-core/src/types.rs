use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Indicators derived from one ticker's recent daily history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceIndicators {
    pub ticker: String,
    /// 0-100; `None` when the window is too short or completely flat.
    pub rsi: Option<f64>,
    /// Percent change between the two most recent closes.
    pub change_pct: f64,
    /// Latest traded volume.
    pub volume: u64,
}

/// One headline from a news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub published: Option<DateTime<Utc>>,
    pub link: String,
}

/// Mention count and keyword sentiment delta for one (ticker, platform).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSignal {
    pub mentions: u32,
    /// Positive-tagged posts minus negative-tagged posts. May be negative.
    pub sentiment: i32,
}

/// Social platforms polled for mentions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialPlatform {
    Reddit,
    Twitter,
}

impl SocialPlatform {
    pub fn name(&self) -> &'static str {
        match self {
            SocialPlatform::Reddit => "reddit",
            SocialPlatform::Twitter => "twitter",
        }
    }
}

/// Companies with a recent ownership-disclosure filing.
///
/// Fetched once per run and shared read-only by every ticker evaluation.
/// Membership is an exact, case-sensitive string match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingSet {
    names: HashSet<String>,
}

impl FilingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FilingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Extend<String> for FilingSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.names.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filing_set_exact_match() {
        let set: FilingSet = ["Apple Inc.", "TSLA"].into_iter().collect();

        assert!(set.contains("TSLA"));
        assert!(!set.contains("tsla"));
        assert!(!set.contains("Apple"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_social_signal_default_is_neutral() {
        let signal = SocialSignal::default();
        assert_eq!(signal.mentions, 0);
        assert_eq!(signal.sentiment, 0);
    }
}
