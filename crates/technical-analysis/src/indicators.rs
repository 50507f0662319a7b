/// Lookback used for the relative strength index
pub const RSI_PERIOD: usize = 14;

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Split close-to-close changes into gains and losses (both non-negative).
fn gains_and_losses(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut gains = Vec::with_capacity(data.len().saturating_sub(1));
    let mut losses = Vec::with_capacity(data.len().saturating_sub(1));

    for pair in data.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    (gains, losses)
}

/// Relative Strength Index of the most recent window.
///
/// Rolling simple averages of gains and losses over the last `period` changes:
/// `RS = avg_gain / avg_loss`, `RSI = 100 - 100 / (1 + RS)`.
/// Needs `period + 1` closes. A window with no movement at all has no defined
/// RSI and yields `None`; a window with gains and no losses yields 100.
pub fn rsi(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period + 1 {
        return None;
    }

    let (gains, losses) = gains_and_losses(data);
    let avg_gain = *sma(&gains, period).last()?;
    let avg_loss = *sma(&losses, period).last()?;

    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { None } else { Some(100.0) };
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Percent change between the two most recent values.
pub fn change_pct(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }

    let latest = data[data.len() - 1];
    let previous = data[data.len() - 2];
    if previous == 0.0 {
        return None;
    }

    Some((latest - previous) / previous * 100.0)
}
