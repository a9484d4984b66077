//! Unit tests for the signal fuser

use pairscope::models::indicators::{
    BandPosition, BollingerIndicator, IndicatorSet, MacdIndicator, MacdTrend, SupportResistance,
    TrendDirection, VolumeAnalysis, VolumeStatus,
};
use pairscope::models::signal::SignalDirection;
use pairscope::signals::SignalFuser;

fn baseline_indicators() -> IndicatorSet {
    IndicatorSet {
        rsi: 50.0,
        macd: MacdIndicator {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
            trend: MacdTrend::Bullish,
        },
        bollinger: BollingerIndicator {
            upper: 105.0,
            middle: 100.0,
            lower: 95.0,
            position: BandPosition::Neutral,
        },
        atr: 2.0,
        support_resistance: SupportResistance {
            support: 90.0,
            resistance: 110.0,
        },
        trend: TrendDirection::Sideways,
        volume: VolumeAnalysis {
            current: 1000.0,
            average: 1000.0,
            ratio: 1.0,
            status: VolumeStatus::Normal,
        },
    }
}

#[test]
fn unanimous_long_evidence_caps_confidence() {
    let mut indicators = baseline_indicators();
    indicators.rsi = 25.0;
    indicators.macd.histogram = 0.5;
    indicators.bollinger.position = BandPosition::Oversold;
    indicators.support_resistance.support = 100.0;
    indicators.trend = TrendDirection::StrongUptrend;

    let signal = SignalFuser::generate_signal(&indicators, 100.0);

    assert_eq!(signal.direction, SignalDirection::Long);
    // five long votes sum to 100, capped at 95
    assert_eq!(signal.confidence, 95.0);
    assert_eq!(signal.entry, 100.0);
    assert_eq!(signal.stop_loss, 97.0);
    assert_eq!(signal.take_profit, 107.5);
    assert_eq!(signal.risk_reward, 2.5);
    assert_eq!(signal.atr, 2.0);
}

#[test]
fn unanimous_short_evidence_mirrors_the_levels() {
    let mut indicators = baseline_indicators();
    indicators.rsi = 75.0;
    indicators.macd.trend = MacdTrend::Bearish;
    indicators.macd.histogram = -0.5;
    indicators.bollinger.position = BandPosition::Overbought;
    indicators.support_resistance.resistance = 100.0;
    indicators.trend = TrendDirection::StrongDowntrend;

    let signal = SignalFuser::generate_signal(&indicators, 100.0);

    assert_eq!(signal.direction, SignalDirection::Short);
    assert_eq!(signal.confidence, 95.0);
    assert_eq!(signal.stop_loss, 103.0);
    assert_eq!(signal.take_profit, 92.5);
    assert_eq!(signal.risk_reward, 2.5);
}

#[test]
fn balanced_votes_produce_a_neutral_signal() {
    // RSI mid-zone, zero histogram, neutral bands, price far from both
    // levels, sideways trend: nobody votes.
    let indicators = baseline_indicators();
    let signal = SignalFuser::generate_signal(&indicators, 100.0);

    assert_eq!(signal.direction, SignalDirection::Neutral);
    assert_eq!(signal.confidence, 40.0);
    // neutral keeps the long orientation for its levels
    assert_eq!(signal.stop_loss, 97.0);
    assert_eq!(signal.take_profit, 107.5);
}

#[test]
fn one_long_one_short_vote_ties_to_neutral() {
    let mut indicators = baseline_indicators();
    indicators.rsi = 25.0; // long vote
    indicators.trend = TrendDirection::Downtrend; // short vote
    let signal = SignalFuser::generate_signal(&indicators, 100.0);

    assert_eq!(signal.direction, SignalDirection::Neutral);
    assert_eq!(signal.confidence, 40.0);
}

#[test]
fn majority_wins_and_only_its_weights_count() {
    let mut indicators = baseline_indicators();
    indicators.rsi = 25.0; // long 25
    indicators.macd.trend = MacdTrend::Bearish;
    indicators.macd.histogram = -0.4; // short 20
    indicators.trend = TrendDirection::Uptrend; // long 20

    let signal = SignalFuser::generate_signal(&indicators, 100.0);

    assert_eq!(signal.direction, SignalDirection::Long);
    // losing side's 20 is discarded: 25 + 20
    assert_eq!(signal.confidence, 45.0);
}

#[test]
fn proximity_to_support_votes_long() {
    let mut indicators = baseline_indicators();
    indicators.support_resistance.support = 99.5;
    // price within 1% above support
    let signal = SignalFuser::generate_signal(&indicators, 100.0);
    assert_eq!(signal.direction, SignalDirection::Long);
    assert_eq!(signal.confidence, 20.0);
}

#[test]
fn proximity_to_resistance_votes_short() {
    let mut indicators = baseline_indicators();
    indicators.support_resistance.resistance = 100.5;
    let signal = SignalFuser::generate_signal(&indicators, 100.0);
    assert_eq!(signal.direction, SignalDirection::Short);
    assert_eq!(signal.confidence, 20.0);
}

#[test]
fn zero_atr_falls_back_to_the_fixed_ratio() {
    let mut indicators = baseline_indicators();
    indicators.atr = 0.0;
    let signal = SignalFuser::generate_signal(&indicators, 100.0);

    assert_eq!(signal.stop_loss, 100.0);
    assert_eq!(signal.take_profit, 100.0);
    assert_eq!(signal.risk_reward, 2.5);
}

#[test]
fn identical_inputs_give_bit_identical_output() {
    let mut indicators = baseline_indicators();
    indicators.rsi = 27.3;
    indicators.macd.histogram = 0.123456;
    indicators.atr = 1.7320508;

    let a = SignalFuser::generate_signal(&indicators, 64123.456789);
    let b = SignalFuser::generate_signal(&indicators, 64123.456789);

    assert_eq!(a.direction, b.direction);
    assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
    assert_eq!(a.entry.to_bits(), b.entry.to_bits());
    assert_eq!(a.take_profit.to_bits(), b.take_profit.to_bits());
    assert_eq!(a.stop_loss.to_bits(), b.stop_loss.to_bits());
    assert_eq!(a.risk_reward.to_bits(), b.risk_reward.to_bits());
    assert_eq!(a.atr.to_bits(), b.atr.to_bits());
}

#[test]
fn rounding_applies_to_prices_and_ratios() {
    let mut indicators = baseline_indicators();
    indicators.rsi = 25.0;
    indicators.atr = 0.0000017;
    // keep the price well away from both levels so only RSI votes
    indicators.support_resistance = SupportResistance {
        support: 1.0,
        resistance: 2.0,
    };
    let signal = SignalFuser::generate_signal(&indicators, 1.23456789);

    assert_eq!(signal.entry, 1.234568);
    assert_eq!(signal.risk_reward, 2.5);
    // one decimal for confidence
    assert_eq!(signal.confidence, 25.0);
}
