//! Unit tests for the MACD indicator

use chrono::{TimeZone, Utc};
use pairscope::indicators::momentum::calculate_macd;
use pairscope::models::candle::Candle;
use pairscope::models::indicators::MacdTrend;

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
fn flat_series_collapses_to_zero() {
    let macd = calculate_macd(&candles_from_closes(&[42.0; 60]), 12, 26, 9);
    assert_eq!(macd.macd, 0.0);
    assert_eq!(macd.signal, 0.0);
    assert_eq!(macd.histogram, 0.0);
    // zero histogram is not bullish
    assert_eq!(macd.trend, MacdTrend::Bearish);
}

#[test]
fn steady_rise_reads_bullish() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let macd = calculate_macd(&candles_from_closes(&closes), 12, 26, 9);
    assert!(macd.macd > 0.0);
    assert!(macd.histogram > 0.0);
    assert_eq!(macd.trend, MacdTrend::Bullish);
}

#[test]
fn steady_fall_reads_bearish() {
    let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    let macd = calculate_macd(&candles_from_closes(&closes), 12, 26, 9);
    assert!(macd.macd < 0.0);
    assert!(macd.histogram < 0.0);
    assert_eq!(macd.trend, MacdTrend::Bearish);
}

#[test]
fn values_are_finite_and_rounded() {
    let closes: Vec<f64> = (0..40).map(|i| 1.0e-4 * (1.0 + (i % 7) as f64)).collect();
    let macd = calculate_macd(&candles_from_closes(&closes), 12, 26, 9);
    for value in [macd.macd, macd.signal, macd.histogram] {
        assert!(value.is_finite());
        // rounded to 6 decimals
        assert_eq!(value, (value * 1e6).round() / 1e6);
    }
}
