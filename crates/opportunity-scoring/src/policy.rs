use analysis_core::{FilingSet, PriceIndicators, SocialSignal};
use serde::{Deserialize, Serialize};

use crate::rules::{self, Rule};

/// Which rule table to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringPolicy {
    /// Price change magnitude and raw headline count
    Simple,
    /// Technicals, AI sentiment, social buzz and ownership filings
    Advanced,
}

impl ScoringPolicy {
    /// Alert when the total reaches this value
    pub fn threshold(&self) -> i32 {
        match self {
            ScoringPolicy::Simple => 5,
            ScoringPolicy::Advanced => 8,
        }
    }

    /// Daily bars needed before a ticker can be scored
    pub fn min_history(&self) -> usize {
        match self {
            ScoringPolicy::Simple => 2,
            ScoringPolicy::Advanced => 20,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringPolicy::Simple => "simple",
            ScoringPolicy::Advanced => "advanced",
        }
    }
}

/// Inputs for the simple policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleSignals {
    pub change_pct: Option<f64>,
    pub news_count: usize,
}

/// Inputs for the advanced policy
#[derive(Debug, Clone, Copy)]
pub struct AdvancedSignals<'a> {
    pub indicators: &'a PriceIndicators,
    pub ai_sentiment: f64,
    pub reddit: SocialSignal,
    pub twitter: SocialSignal,
}

/// Per-rule contributions and their sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub policy: ScoringPolicy,
    pub contributions: Vec<(Rule, i32)>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.contributions.iter().map(|(_, points)| points).sum()
    }

    /// Contribution of one rule (0 if the rule is not part of this policy)
    pub fn points(&self, rule: Rule) -> i32 {
        self.contributions
            .iter()
            .filter(|(r, _)| *r == rule)
            .map(|(_, points)| points)
            .sum()
    }

    /// Whether the total reaches the policy's alert threshold
    pub fn qualifies(&self) -> bool {
        self.total() >= self.policy.threshold()
    }

    /// Rules that moved the score, e.g. `"RSI +4, Momentum +5"`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .contributions
            .iter()
            .filter(|(_, points)| *points != 0)
            .map(|(rule, points)| format!("{} {:+}", rule.label(), points))
            .collect();

        if parts.is_empty() {
            "no contributing rules".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// First-version policy: strict |change| > 5 for +3, plus the headline count when above 3
pub fn score_simple(signals: &SimpleSignals) -> ScoreBreakdown {
    ScoreBreakdown {
        policy: ScoringPolicy::Simple,
        contributions: vec![
            (Rule::SimpleMomentum, rules::simple_momentum_points(signals.change_pct)),
            (Rule::NewsCount, rules::news_count_points(signals.news_count)),
        ],
    }
}

/// Second-version policy: seven independent additive rules
pub fn score_advanced(signals: &AdvancedSignals<'_>, filings: &FilingSet) -> ScoreBreakdown {
    let indicators = signals.indicators;

    ScoreBreakdown {
        policy: ScoringPolicy::Advanced,
        contributions: vec![
            (Rule::Rsi, rules::rsi_points(indicators.rsi)),
            (Rule::Momentum, rules::momentum_points(indicators.change_pct)),
            (Rule::Volume, rules::volume_points(indicators.volume)),
            (Rule::AiSentiment, rules::ai_sentiment_points(signals.ai_sentiment)),
            (Rule::Reddit, rules::social_points(&signals.reddit)),
            (Rule::Twitter, rules::social_points(&signals.twitter)),
            (Rule::Filing, rules::filing_points(filings.contains(&indicators.ticker))),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(ticker: &str, rsi: Option<f64>, change_pct: f64, volume: u64) -> PriceIndicators {
        PriceIndicators {
            ticker: ticker.to_string(),
            rsi,
            change_pct,
            volume,
        }
    }

    fn neutral_signals(ind: &PriceIndicators) -> AdvancedSignals<'_> {
        AdvancedSignals {
            indicators: ind,
            ai_sentiment: 0.0,
            reddit: SocialSignal::default(),
            twitter: SocialSignal::default(),
        }
    }

    #[test]
    fn test_end_to_end_scenario_scores_22() {
        let ind = indicators("NVDA", Some(25.0), 6.0, 2_000_000);
        let signals = AdvancedSignals {
            indicators: &ind,
            ai_sentiment: 3.0,
            reddit: SocialSignal { mentions: 10, sentiment: 2 },
            twitter: SocialSignal { mentions: 1, sentiment: -1 },
        };
        let filings: FilingSet = ["NVDA"].into_iter().collect();

        let breakdown = score_advanced(&signals, &filings);

        assert_eq!(breakdown.points(Rule::Rsi), 4);
        assert_eq!(breakdown.points(Rule::Momentum), 5);
        assert_eq!(breakdown.points(Rule::Volume), 1);
        assert_eq!(breakdown.points(Rule::AiSentiment), 5);
        assert_eq!(breakdown.points(Rule::Reddit), 4);
        assert_eq!(breakdown.points(Rule::Twitter), -1);
        assert_eq!(breakdown.points(Rule::Filing), 4);
        assert_eq!(breakdown.total(), 22);
        assert!(breakdown.qualifies());
    }

    #[test]
    fn test_all_neutral_scores_zero() {
        let ind = indicators("KO", None, 0.4, 900_000);
        let breakdown = score_advanced(&neutral_signals(&ind), &FilingSet::new());

        assert_eq!(breakdown.total(), 0);
        assert!(!breakdown.qualifies());
        assert_eq!(breakdown.summary(), "no contributing rules");
    }

    #[test]
    fn test_filing_always_adds_four() {
        let filings: FilingSet = ["PFE"].into_iter().collect();

        for (rsi, change) in [(Some(80.0), 0.0), (Some(10.0), -9.0), (None, 1.0)] {
            let ind = indicators("PFE", rsi, change, 10);
            let with = score_advanced(&neutral_signals(&ind), &filings);
            let without = score_advanced(&neutral_signals(&ind), &FilingSet::new());

            assert_eq!(with.points(Rule::Filing), 4);
            assert_eq!(with.total() - without.total(), 4);
        }
    }

    #[test]
    fn test_score_can_go_negative() {
        let ind = indicators("INTC", Some(75.0), 1.0, 10);
        let signals = AdvancedSignals {
            indicators: &ind,
            ai_sentiment: -4.0,
            reddit: SocialSignal { mentions: 3, sentiment: -3 },
            twitter: SocialSignal { mentions: 2, sentiment: -2 },
        };

        assert_eq!(score_advanced(&signals, &FilingSet::new()).total(), -3 - 5 - 3 - 2);
    }

    #[test]
    fn test_total_is_order_independent() {
        let ind = indicators("AMD", Some(22.0), -5.0, 5_000_000);
        let signals = AdvancedSignals {
            indicators: &ind,
            ai_sentiment: -3.0,
            reddit: SocialSignal { mentions: 8, sentiment: -1 },
            twitter: SocialSignal { mentions: 6, sentiment: 3 },
        };
        let breakdown = score_advanced(&signals, &FilingSet::new());

        let mut reversed = breakdown.clone();
        reversed.contributions.reverse();
        let mut rotated = breakdown.clone();
        rotated.contributions.rotate_left(3);

        assert_eq!(breakdown.total(), 4 + 5 + 1 - 5 + 1 + 5);
        assert_eq!(reversed.total(), breakdown.total());
        assert_eq!(rotated.total(), breakdown.total());
    }

    #[test]
    fn test_exact_five_percent_differs_between_policies() {
        let ind = indicators("TSLA", None, -5.0, 0);
        let advanced = score_advanced(&neutral_signals(&ind), &FilingSet::new());
        let simple = score_simple(&SimpleSignals { change_pct: Some(-5.0), news_count: 0 });

        assert_eq!(advanced.points(Rule::Momentum), 5);
        assert_eq!(simple.points(Rule::SimpleMomentum), 0);
    }

    #[test]
    fn test_simple_policy_threshold() {
        let below = score_simple(&SimpleSignals { change_pct: Some(6.0), news_count: 3 });
        assert_eq!(below.total(), 3);
        assert!(!below.qualifies());

        let news_only = score_simple(&SimpleSignals { change_pct: None, news_count: 5 });
        assert_eq!(news_only.total(), 5);
        assert!(news_only.qualifies());

        let both = score_simple(&SimpleSignals { change_pct: Some(-8.0), news_count: 20 });
        assert_eq!(both.total(), 23);
    }

    #[test]
    fn test_summary_lists_nonzero_rules() {
        let breakdown = score_simple(&SimpleSignals { change_pct: Some(6.0), news_count: 4 });
        assert_eq!(breakdown.summary(), "Momentum +3, News count +4");
    }

    #[test]
    fn test_policy_constants() {
        assert_eq!(ScoringPolicy::Advanced.threshold(), 8);
        assert_eq!(ScoringPolicy::Simple.threshold(), 5);
        assert_eq!(ScoringPolicy::Advanced.min_history(), 20);
    }
}
