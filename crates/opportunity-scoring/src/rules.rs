//! Individual scoring rules.
//!
//! Thresholds and strict-vs-closed comparisons are part of the contract: they
//! decide which tickers alert.

use analysis_core::SocialSignal;
use serde::{Deserialize, Serialize};

/// RSI below this is oversold
pub const RSI_OVERSOLD: f64 = 30.0;
/// RSI above this is overbought
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// Absolute daily move (percent) for the momentum rules
pub const MOMENTUM_CHANGE_PCT: f64 = 5.0;
/// Latest volume above this counts as heavy trading
pub const HEAVY_VOLUME: u64 = 1_000_000;
/// AI sentiment dead zone half-width
pub const AI_SENTIMENT_BAND: f64 = 2.0;
/// Mentions above this earn the buzz bonus
pub const SOCIAL_BUZZ_MENTIONS: u32 = 5;
/// Headline count above this adds the count itself (simple policy)
pub const NEWS_COUNT_FLOOR: usize = 3;

/// Named rule, used in score breakdowns and alert text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Rsi,
    Momentum,
    Volume,
    AiSentiment,
    Reddit,
    Twitter,
    Filing,
    SimpleMomentum,
    NewsCount,
}

impl Rule {
    pub fn label(&self) -> &'static str {
        match self {
            Rule::Rsi => "RSI",
            Rule::Momentum => "Momentum",
            Rule::Volume => "Volume",
            Rule::AiSentiment => "AI sentiment",
            Rule::Reddit => "Reddit",
            Rule::Twitter => "Twitter",
            Rule::Filing => "Filing",
            Rule::SimpleMomentum => "Momentum",
            Rule::NewsCount => "News count",
        }
    }
}

/// +4 below 30, -3 above 70, 0 in [30, 70] or when absent
pub fn rsi_points(rsi: Option<f64>) -> i32 {
    match rsi {
        Some(value) if value < RSI_OVERSOLD => 4,
        Some(value) if value > RSI_OVERBOUGHT => -3,
        _ => 0,
    }
}

/// +5 when |change| >= 5 (closed)
pub fn momentum_points(change_pct: f64) -> i32 {
    if change_pct.abs() >= MOMENTUM_CHANGE_PCT {
        5
    } else {
        0
    }
}

/// +1 when volume > 1,000,000
pub fn volume_points(volume: u64) -> i32 {
    if volume > HEAVY_VOLUME {
        1
    } else {
        0
    }
}

/// +5 above 2, -5 below -2, 0 in between
pub fn ai_sentiment_points(score: f64) -> i32 {
    if score > AI_SENTIMENT_BAND {
        5
    } else if score < -AI_SENTIMENT_BAND {
        -5
    } else {
        0
    }
}

/// +2 when mentions > 5, always plus the raw sentiment delta (unclamped)
pub fn social_points(signal: &SocialSignal) -> i32 {
    let buzz = if signal.mentions > SOCIAL_BUZZ_MENTIONS { 2 } else { 0 };
    buzz + signal.sentiment
}

/// +4 for a recent ownership filing
pub fn filing_points(in_filing_set: bool) -> i32 {
    if in_filing_set {
        4
    } else {
        0
    }
}

/// +3 when |change| > 5 (strict); absent change scores 0
pub fn simple_momentum_points(change_pct: Option<f64>) -> i32 {
    match change_pct {
        Some(change) if change.abs() > MOMENTUM_CHANGE_PCT => 3,
        _ => 0,
    }
}

/// The headline count itself when more than 3 headlines, else 0
pub fn news_count_points(news_count: usize) -> i32 {
    if news_count > NEWS_COUNT_FLOOR {
        i32::try_from(news_count).unwrap_or(i32::MAX)
    } else {
        0
    }
}
