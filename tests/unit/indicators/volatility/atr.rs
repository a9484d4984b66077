//! Unit tests for ATR

use chrono::{TimeZone, Utc};
use pairscope::indicators::volatility::calculate_atr;
use pairscope::models::candle::Candle;

fn ranged_candles(count: usize, close: f64, half_range: f64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap();
            Candle::new(
                close,
                close + half_range,
                close - half_range,
                close,
                1000.0,
                ts,
            )
        })
        .collect()
}

#[test]
fn flat_bars_have_zero_atr() {
    let candles = ranged_candles(20, 100.0, 0.0);
    assert_eq!(calculate_atr(&candles, 14), 0.0);
}

#[test]
fn constant_range_equals_atr() {
    let candles = ranged_candles(20, 100.0, 1.0);
    assert_eq!(calculate_atr(&candles, 14), 2.0);
}

#[test]
fn gap_widens_true_range() {
    // Two bars: second gaps up far beyond its own high-low span.
    let ts0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let ts1 = Utc.timestamp_opt(1_700_003_600, 0).unwrap();
    let candles = vec![
        Candle::new(100.0, 101.0, 99.0, 100.0, 1000.0, ts0),
        Candle::new(120.0, 121.0, 119.0, 120.0, 1000.0, ts1),
    ];
    // tr = [2.0, max(2.0, |121-100|, |119-100|)] = [2.0, 21.0]
    assert_eq!(calculate_atr(&candles, 14), 11.5);
}

#[test]
fn atr_is_never_negative_or_non_finite() {
    let candles = ranged_candles(50, 0.0001, 0.00005);
    let atr = calculate_atr(&candles, 14);
    assert!(atr >= 0.0);
    assert!(atr.is_finite());
}
