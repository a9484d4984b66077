//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::candle::Candle;
use crate::models::indicators::{MacdIndicator, MacdTrend};

/// Calculate MACD from the full close series.
///
/// MACD line = EMA(fast) - EMA(slow), computed element-wise over the whole
/// series with both EMAs seeded at the first close. Signal line = EMA of the
/// MACD line, histogram = MACD - signal. The trend label is bullish exactly
/// when the histogram is positive.
pub fn calculate_macd(
    candles: &[Candle],
    fast: usize,
    slow: usize,
    signal: usize,
) -> MacdIndicator {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let fast_series = math::ema_series(&closes, fast);
    let slow_series = math::ema_series(&closes, slow);

    let macd_series: Vec<f64> = fast_series
        .iter()
        .zip(slow_series.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_series = math::ema_series(&macd_series, signal);

    let macd_line = math::finite_or(macd_series.last().copied().unwrap_or(0.0), 0.0);
    let signal_line = math::finite_or(signal_series.last().copied().unwrap_or(0.0), 0.0);
    let histogram = macd_line - signal_line;

    let trend = if histogram > 0.0 {
        MacdTrend::Bullish
    } else {
        MacdTrend::Bearish
    };

    MacdIndicator {
        macd: math::round_to(macd_line, 6),
        signal: math::round_to(signal_line, 6),
        histogram: math::round_to(histogram, 6),
        trend,
    }
}
