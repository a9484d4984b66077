//! Support and resistance levels from local extrema

use crate::common::math;
use crate::models::candle::Candle;
use crate::models::indicators::SupportResistance;

/// Find the nearest support below and resistance above the current close.
///
/// Candidates are 3-point strict local minima of lows (supports) and maxima
/// of highs (resistances) within the trailing `lookback` window. When no
/// candidate exists on a side, fall back to close * 0.97 / close * 1.03.
pub fn find_support_resistance(candles: &[Candle], lookback: usize) -> SupportResistance {
    let lookback = lookback.min(candles.len());
    let recent = &candles[candles.len() - lookback..];
    let current = candles.last().map(|c| c.close).unwrap_or(0.0);

    let mut supports = Vec::new();
    let mut resistances = Vec::new();
    for i in 1..recent.len().saturating_sub(1) {
        if recent[i].low < recent[i - 1].low && recent[i].low < recent[i + 1].low {
            supports.push(recent[i].low);
        }
        if recent[i].high > recent[i - 1].high && recent[i].high > recent[i + 1].high {
            resistances.push(recent[i].high);
        }
    }

    let support = supports
        .iter()
        .copied()
        .filter(|s| *s < current)
        .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
        .unwrap_or(current * 0.97);

    let resistance = resistances
        .iter()
        .copied()
        .filter(|r| *r > current)
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.min(r))))
        .unwrap_or(current * 1.03);

    SupportResistance {
        support: math::round_to(math::finite_or(support, current * 0.97), 6),
        resistance: math::round_to(math::finite_or(resistance, current * 1.03), 6),
    }
}
