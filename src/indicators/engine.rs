//! Indicator engine: one pass over an OHLCV series
//!
//! The engine owns the only fatal precondition in the analysis core: at
//! least [`MIN_HISTORY`] price points. Everything downstream of that check
//! recovers locally (shrunken windows, neutral defaults) and never surfaces
//! a non-finite number.

use crate::indicators::error::IndicatorError;
use crate::indicators::{momentum, structure, trend, volatility, volume};
use crate::models::candle::Candle;
use crate::models::indicators::IndicatorSet;

/// Minimum number of price points for any analysis.
pub const MIN_HISTORY: usize = 14;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;
pub const SR_LOOKBACK: usize = 50;

/// Computes the full indicator set from one price series.
///
/// The series is sorted by timestamp on construction; callers may pass
/// history in any order. The input is never mutated after that, and each
/// [`IndicatorEngine::compute`] call derives a fresh [`IndicatorSet`].
pub struct IndicatorEngine {
    candles: Vec<Candle>,
}

impl IndicatorEngine {
    pub fn new(mut history: Vec<Candle>) -> Result<Self, IndicatorError> {
        if history.len() < MIN_HISTORY {
            return Err(IndicatorError::InsufficientData {
                have: history.len(),
                need: MIN_HISTORY,
            });
        }
        history.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(Self { candles: history })
    }

    pub fn compute(&self) -> IndicatorSet {
        IndicatorSet {
            rsi: momentum::calculate_rsi(&self.candles, RSI_PERIOD),
            macd: momentum::calculate_macd(&self.candles, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
            bollinger: volatility::calculate_bollinger(
                &self.candles,
                BOLLINGER_PERIOD,
                BOLLINGER_K,
            ),
            atr: volatility::calculate_atr(&self.candles, ATR_PERIOD),
            support_resistance: structure::find_support_resistance(&self.candles, SR_LOOKBACK),
            trend: trend::classify_trend(&self.candles),
            volume: volume::analyze_volume(&self.candles),
        }
    }
}

/// Compute the indicator set for a price series.
///
/// Fails only when the series has fewer than [`MIN_HISTORY`] points.
pub fn compute_indicators(history: Vec<Candle>) -> Result<IndicatorSet, IndicatorError> {
    Ok(IndicatorEngine::new(history)?.compute())
}
