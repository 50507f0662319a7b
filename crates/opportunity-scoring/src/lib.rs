//! Opportunity Scoring
//!
//! Additive rule tables that turn one ticker's signals into an integer score.
//! Every rule contributes independently; the total is the plain sum, may be
//! negative, and is the only value compared against the alert threshold.

pub mod rules;
pub mod policy;

pub use policy::{
    score_advanced, score_simple, AdvancedSignals, ScoreBreakdown, ScoringPolicy, SimpleSignals,
};
pub use rules::Rule;
