//! Unit tests for the RSI indicator

use chrono::{TimeZone, Utc};
use pairscope::indicators::momentum::calculate_rsi;
use pairscope::models::candle::Candle;

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
fn strictly_increasing_series_hits_the_neutral_fallback() {
    // All gains, zero losses: the zero-denominator fallback substitutes the
    // neutral default instead of letting the ratio blow up toward 100.
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let rsi = calculate_rsi(&candles_from_closes(&closes), 14);
    assert_eq!(rsi, 50.0);
}

#[test]
fn flat_series_is_neutral() {
    let rsi = calculate_rsi(&candles_from_closes(&[100.0; 20]), 14);
    assert_eq!(rsi, 50.0);
}

#[test]
fn strictly_decreasing_series_is_fully_oversold() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
    let rsi = calculate_rsi(&candles_from_closes(&closes), 14);
    assert_eq!(rsi, 0.0);
}

#[test]
fn rsi_stays_in_bounds() {
    let closes: Vec<f64> = (0..40)
        .map(|i| {
            let swing = if i % 3 == 0 { 2.0 } else { -1.0 };
            100.0 + swing * (i % 5) as f64
        })
        .collect();
    let rsi = calculate_rsi(&candles_from_closes(&closes), 14);
    assert!((0.0..=100.0).contains(&rsi));
    assert!(rsi.is_finite());
}

#[test]
fn short_window_shrinks_instead_of_failing() {
    // 14 candles only give 13 deltas; the window shrinks rather than
    // producing an undefined average.
    let closes: Vec<f64> = (0..14).map(|i| 100.0 + (i % 4) as f64).collect();
    let rsi = calculate_rsi(&candles_from_closes(&closes), 14);
    assert!(rsi.is_finite());
    assert!((0.0..=100.0).contains(&rsi));
}
