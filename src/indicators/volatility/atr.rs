//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::candle::Candle;

/// Calculate ATR as the simple rolling mean of true range over `period`.
///
/// The first bar has no previous close, so its true range is high - low.
pub fn calculate_atr(candles: &[Candle], period: usize) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }

    let mut true_ranges = Vec::with_capacity(candles.len());
    true_ranges.push(candles[0].high - candles[0].low);
    for pair in candles.windows(2) {
        true_ranges.push(math::true_range(pair[1].high, pair[1].low, pair[0].close));
    }

    let atr = math::sma(&true_ranges, period).unwrap_or(0.0);
    math::round_to(math::finite_or(atr, 0.0), 6)
}
