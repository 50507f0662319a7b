use analysis_core::{Bar, PriceIndicators, SourceError};

use crate::indicators::*;

/// Derive indicators from daily bars (oldest first).
///
/// Fails with `InsufficientData` when fewer than `min_history` bars are
/// available and with `InvalidData` when the previous close is zero. A short
/// RSI window only blanks the RSI; the record itself is still produced as long
/// as `min_history` is met.
pub fn price_indicators(
    ticker: &str,
    bars: &[Bar],
    min_history: usize,
) -> Result<PriceIndicators, SourceError> {
    let required = min_history.max(2);
    if bars.len() < required {
        tracing::debug!(ticker, bars = bars.len(), required, "Not enough price history for indicators");
        return Err(SourceError::InsufficientData(format!(
            "{} daily bars, need {}",
            bars.len(),
            required
        )));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let change_pct = change_pct(&closes)
        .ok_or_else(|| SourceError::InvalidData("previous close is zero".to_string()))?;
    let volume = bars.last().map(|b| b.volume).unwrap_or(0);

    Ok(PriceIndicators {
        ticker: ticker.to_string(),
        rsi: rsi(&closes, RSI_PERIOD),
        change_pct,
        volume,
    })
}
