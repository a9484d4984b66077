//! Unit tests for volume analysis

use chrono::{TimeZone, Utc};
use pairscope::indicators::volume::analyze_volume;
use pairscope::models::candle::Candle;
use pairscope::models::indicators::VolumeStatus;

fn candles_with_volumes(volumes: &[f64]) -> Vec<Candle> {
    volumes
        .iter()
        .enumerate()
        .map(|(i, &volume)| {
            let ts = Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap();
            Candle::new(100.0, 100.0, 100.0, 100.0, volume, ts)
        })
        .collect()
}

#[test]
fn constant_volume_is_normal() {
    let analysis = analyze_volume(&candles_with_volumes(&[1000.0; 30]));
    assert_eq!(analysis.ratio, 1.0);
    assert_eq!(analysis.status, VolumeStatus::Normal);
    assert_eq!(analysis.current, 1000.0);
    assert_eq!(analysis.average, 1000.0);
}

#[test]
fn volume_spike_is_high() {
    let mut volumes = vec![1000.0; 19];
    volumes.push(10_000.0);
    let analysis = analyze_volume(&candles_with_volumes(&volumes));
    // average over the window includes the spike itself
    assert!(analysis.ratio > 1.5);
    assert_eq!(analysis.status, VolumeStatus::High);
}

#[test]
fn volume_collapse_is_low() {
    let mut volumes = vec![1000.0; 19];
    volumes.push(100.0);
    let analysis = analyze_volume(&candles_with_volumes(&volumes));
    assert!(analysis.ratio <= 0.7);
    assert_eq!(analysis.status, VolumeStatus::Low);
}

#[test]
fn zero_average_defaults_the_ratio() {
    // Feeds without volume data report all zeros; the ratio defaults to 1.0
    // instead of dividing by zero.
    let analysis = analyze_volume(&candles_with_volumes(&[0.0; 25]));
    assert_eq!(analysis.ratio, 1.0);
    assert_eq!(analysis.status, VolumeStatus::Normal);
}

#[test]
fn average_uses_the_trailing_twenty_bars() {
    let mut volumes = vec![9000.0; 10];
    volumes.extend(vec![1000.0; 20]);
    let analysis = analyze_volume(&candles_with_volumes(&volumes));
    // the early high-volume bars are outside the window
    assert_eq!(analysis.average, 1000.0);
}
