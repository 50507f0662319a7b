use crate::SourceError;

/// Outcome of a data source call after graceful degradation.
///
/// A failing source never aborts the run. Its error is logged and replaced by
/// the neutral default for the value type (no indicators, no headlines, a zero
/// signal, an empty filing set, a zero sentiment score). Keeping the reason
/// lets callers tell "zero mentions" apart from "fetch failed".
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResult<T> {
    Fresh(T),
    Degraded { fallback: T, reason: String },
}

impl<T: Default> SourceResult<T> {
    /// Settle a raw fetch result, logging and substituting the default on error.
    pub fn settle(source: &str, ticker: Option<&str>, result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => SourceResult::Fresh(value),
            Err(e) => {
                match ticker {
                    Some(ticker) => tracing::warn!(source, ticker, "Data source unavailable: {}", e),
                    None => tracing::warn!(source, "Data source unavailable: {}", e),
                }
                SourceResult::Degraded {
                    fallback: T::default(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl<T> SourceResult<T> {
    pub fn value(&self) -> &T {
        match self {
            SourceResult::Fresh(value) => value,
            SourceResult::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            SourceResult::Fresh(value) => value,
            SourceResult::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SourceResult::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            SourceResult::Fresh(_) => None,
            SourceResult::Degraded { reason, .. } => Some(reason),
        }
    }
}
