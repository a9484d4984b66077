//! Bollinger Bands indicator

use crate::common::math;
use crate::models::candle::Candle;
use crate::models::indicators::{BandPosition, BollingerIndicator};

/// Calculate Bollinger Bands over the trailing `period` closes.
///
/// Middle = SMA(period), upper/lower = middle +/- k * sample standard
/// deviation. The position label compares the current close against the
/// bands: at or above the upper band is overbought, at or below the lower
/// band is oversold.
pub fn calculate_bollinger(candles: &[Candle], period: usize, k: f64) -> BollingerIndicator {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let current = closes.last().copied().unwrap_or(0.0);

    let middle = math::finite_or(math::sma(&closes, period).unwrap_or(current), current);
    let std = math::finite_or(math::sample_std(&closes, period).unwrap_or(0.0), 0.0);

    let upper = middle + k * std;
    let lower = middle - k * std;

    let position = if current >= upper {
        BandPosition::Overbought
    } else if current <= lower {
        BandPosition::Oversold
    } else {
        BandPosition::Neutral
    };

    BollingerIndicator {
        upper: math::round_to(upper, 6),
        middle: math::round_to(middle, 6),
        lower: math::round_to(lower, 6),
        position,
    }
}
