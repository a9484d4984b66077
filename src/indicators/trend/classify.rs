//! Overall trend classification from EMA(20) / EMA(50)

use crate::indicators::trend::ema::calculate_ema;
use crate::models::candle::Candle;
use crate::models::indicators::TrendDirection;

/// Minimum series length for a non-degenerate trend classification.
pub const TREND_MIN_HISTORY: usize = 50;

/// Classify the overall trend of the series.
///
/// The branch order is load-bearing: the uptrend/downtrend conditions use OR
/// and overlap with the strong variants, and first match wins. Keep the
/// exact precedence; do not merge or reorder the conditions.
pub fn classify_trend(candles: &[Candle]) -> TrendDirection {
    if candles.len() < TREND_MIN_HISTORY {
        return TrendDirection::InsufficientData;
    }

    let ema_20 = calculate_ema(candles, 20);
    let ema_50 = calculate_ema(candles, 50);
    let price = candles.last().map(|c| c.close).unwrap_or(0.0);

    if price > ema_20 && ema_20 > ema_50 {
        TrendDirection::StrongUptrend
    } else if price > ema_20 || ema_20 > ema_50 {
        TrendDirection::Uptrend
    } else if price < ema_20 && ema_20 < ema_50 {
        TrendDirection::StrongDowntrend
    } else if price < ema_20 || ema_20 < ema_50 {
        TrendDirection::Downtrend
    } else {
        TrendDirection::Sideways
    }
}
