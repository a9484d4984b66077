//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::candle::Candle;

/// Final EMA of the close series for a given span, rounded to 6 decimals.
pub fn calculate_ema(candles: &[Candle], span: usize) -> f64 {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema = math::ema(&closes, span).unwrap_or_else(|| closes.last().copied().unwrap_or(0.0));
    math::round_to(math::finite_or(ema, 0.0), 6)
}
