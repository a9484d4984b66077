//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::candle::Candle;

/// Neutral default substituted whenever the loss average is zero or the
/// ratio goes non-finite. Monotonic windows therefore read as 50, not 100.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Calculate RSI over the trailing `period` close-to-close deltas.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
pub fn calculate_rsi(candles: &[Candle], period: usize) -> f64 {
    let mut gains = Vec::with_capacity(candles.len().saturating_sub(1));
    let mut losses = Vec::with_capacity(candles.len().saturating_sub(1));

    for pair in candles.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let avg_gain = match math::sma(&gains, period) {
        Some(v) => v,
        None => return RSI_NEUTRAL,
    };
    let avg_loss = match math::sma(&losses, period) {
        Some(v) => v,
        None => return RSI_NEUTRAL,
    };

    if avg_loss == 0.0 {
        return RSI_NEUTRAL;
    }

    let rs = avg_gain / avg_loss;
    math::finite_or(100.0 - (100.0 / (1.0 + rs)), RSI_NEUTRAL)
}
