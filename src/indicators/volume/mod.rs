//! Volume analysis

use crate::common::math;
use crate::models::candle::Candle;
use crate::models::indicators::{VolumeAnalysis, VolumeStatus};

/// Window for the trailing average volume.
pub const VOLUME_WINDOW: usize = 20;

/// Compare the current bar's volume against the trailing 20-bar average.
///
/// A zero average (e.g. a feed without volume data) defaults the ratio to
/// 1.0 so the status reads as normal. Status thresholds: high above 1.5,
/// low at or below 0.7.
pub fn analyze_volume(candles: &[Candle]) -> VolumeAnalysis {
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let current = volumes.last().copied().unwrap_or(0.0);
    let average = math::sma(&volumes, VOLUME_WINDOW).unwrap_or(0.0);

    let ratio = if average > 0.0 {
        math::finite_or(current / average, 1.0)
    } else {
        1.0
    };

    let status = if ratio > 1.5 {
        VolumeStatus::High
    } else if ratio > 0.7 {
        VolumeStatus::Normal
    } else {
        VolumeStatus::Low
    };

    VolumeAnalysis {
        current,
        average,
        ratio: math::round_to(ratio, 2),
        status,
    }
}
