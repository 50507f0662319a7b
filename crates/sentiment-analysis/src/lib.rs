use analysis_core::SocialSignal;
use serde::{Deserialize, Serialize};

pub mod llm;
pub use llm::{parse_sentiment_score, LlmConfig, LlmSentimentScorer};

const POSITIVE_WORDS: &[&str] = &[
    "buy", "bull", "moon", "calls", "undervalued", "breakout", "rocket",
    "\u{1f680}", "beat", "upgrade", "surge", "rally", "squeeze",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sell", "bear", "puts", "short", "overvalued", "crash", "dump", "miss",
    "downgrade", "plunge", "bagholder", "drop",
];

/// Keyword tag for one post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentTag {
    Positive,
    Negative,
    Neutral,
}

/// Substring keyword classifier shared by every social platform.
pub struct KeywordClassifier {
    positive_words: Vec<&'static str>,
    negative_words: Vec<&'static str>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            positive_words: POSITIVE_WORDS.to_vec(),
            negative_words: NEGATIVE_WORDS.to_vec(),
        }
    }

    /// Tag a post. Only positive hits is Positive, only negative hits is
    /// Negative; both or neither is Neutral. Matching is case-insensitive
    /// substring search.
    pub fn classify(&self, text: &str) -> SentimentTag {
        let text_lower = text.to_lowercase();
        let positive = self.positive_words.iter().any(|w| text_lower.contains(w));
        let negative = self.negative_words.iter().any(|w| text_lower.contains(w));

        match (positive, negative) {
            (true, false) => SentimentTag::Positive,
            (false, true) => SentimentTag::Negative,
            _ => SentimentTag::Neutral,
        }
    }

    /// Count posts and net their tags into a signal.
    pub fn tally<'a, I>(&self, posts: I) -> SocialSignal
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut signal = SocialSignal::default();
        for post in posts {
            signal.mentions += 1;
            match self.classify(post) {
                SentimentTag::Positive => signal.sentiment += 1,
                SentimentTag::Negative => signal.sentiment -= 1,
                SentimentTag::Neutral => {}
            }
        }
        signal
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}
