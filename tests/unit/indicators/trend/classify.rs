//! Unit tests for trend classification

use chrono::{TimeZone, Utc};
use pairscope::indicators::trend::classify_trend;
use pairscope::models::candle::Candle;
use pairscope::models::indicators::TrendDirection;

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap();
            Candle::new(close, close, close, close, 1000.0, ts)
        })
        .collect()
}

#[test]
fn short_series_is_insufficient_data() {
    let closes: Vec<f64> = (0..49).map(|i| 100.0 + i as f64).collect();
    let trend = classify_trend(&candles_from_closes(&closes));
    assert_eq!(trend, TrendDirection::InsufficientData);
}

#[test]
fn steady_rise_is_a_strong_uptrend() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let trend = classify_trend(&candles_from_closes(&closes));
    assert_eq!(trend, TrendDirection::StrongUptrend);
}

#[test]
fn steady_fall_is_a_strong_downtrend() {
    let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    let trend = classify_trend(&candles_from_closes(&closes));
    assert_eq!(trend, TrendDirection::StrongDowntrend);
}

#[test]
fn flat_series_is_sideways() {
    let trend = classify_trend(&candles_from_closes(&[100.0; 60]));
    assert_eq!(trend, TrendDirection::Sideways);
}

#[test]
fn pullback_after_long_rise_still_reads_uptrend() {
    // Price dips below EMA(20) while EMA(20) remains above EMA(50): the
    // permissive OR branch classifies this as an uptrend, not a downtrend.
    let mut closes: Vec<f64> = (0..55).map(|i| 100.0 + i as f64).collect();
    closes.extend([152.0, 149.0, 146.0, 143.0, 140.0]);
    let trend = classify_trend(&candles_from_closes(&closes));
    assert_eq!(trend, TrendDirection::Uptrend);
}
