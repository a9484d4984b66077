//! Signal fusion: independent-evidence voting with weighted confidence
//!
//! Five evidence sources each optionally cast a LONG or SHORT vote with a
//! fixed weight. Direction is decided by raw vote count; confidence is the
//! weight sum of the winning side, capped below 100 to model irreducible
//! uncertainty. The whole computation is a pure function of the indicator
//! set and the current price.

use tracing::debug;

use crate::common::math;
use crate::models::indicators::{BandPosition, IndicatorSet, MacdTrend};
use crate::models::signal::{Signal, SignalDirection};

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

const WEIGHT_RSI: f64 = 25.0;
const WEIGHT_RSI_NEUTRAL: f64 = 10.0;
const WEIGHT_MACD: f64 = 20.0;
const WEIGHT_BOLLINGER: f64 = 15.0;
const WEIGHT_SUPPORT_RESISTANCE: f64 = 20.0;
const WEIGHT_TREND: f64 = 20.0;

/// Confidence never reaches 100.
const CONFIDENCE_CAP: f64 = 95.0;
/// Fixed confidence for a tied (NEUTRAL) vote.
const NEUTRAL_CONFIDENCE: f64 = 40.0;

/// Stop distance in ATR multiples.
const STOP_ATR_MULTIPLE: f64 = 1.5;
/// Target distance in stop-distance multiples (fixed 2.5:1 reward-risk).
const TARGET_STOP_MULTIPLE: f64 = 2.5;

#[derive(Debug, Clone, Copy)]
struct Vote {
    direction: SignalDirection,
    weight: f64,
}

impl Vote {
    fn long(weight: f64) -> Self {
        Self {
            direction: SignalDirection::Long,
            weight,
        }
    }

    fn short(weight: f64) -> Self {
        Self {
            direction: SignalDirection::Short,
            weight,
        }
    }
}

pub struct SignalFuser;

impl SignalFuser {
    /// Fuse one indicator set and the current price into a trading signal.
    ///
    /// Deterministic: identical inputs produce bit-identical output.
    pub fn generate_signal(indicators: &IndicatorSet, current_price: f64) -> Signal {
        let mut votes: Vec<Vote> = Vec::with_capacity(5);
        // Mid-zone RSI carries weight but votes for neither side.
        let mut neutral_weight = 0.0;

        let rsi = indicators.rsi;
        if rsi < RSI_OVERSOLD {
            votes.push(Vote::long(WEIGHT_RSI));
        } else if rsi > RSI_OVERBOUGHT {
            votes.push(Vote::short(WEIGHT_RSI));
        } else if rsi > 40.0 && rsi < 60.0 {
            neutral_weight += WEIGHT_RSI_NEUTRAL;
        }

        let macd = &indicators.macd;
        if macd.trend == MacdTrend::Bullish && macd.histogram > 0.0 {
            votes.push(Vote::long(WEIGHT_MACD));
        } else if macd.trend == MacdTrend::Bearish && macd.histogram < 0.0 {
            votes.push(Vote::short(WEIGHT_MACD));
        }

        match indicators.bollinger.position {
            BandPosition::Oversold => votes.push(Vote::long(WEIGHT_BOLLINGER)),
            BandPosition::Overbought => votes.push(Vote::short(WEIGHT_BOLLINGER)),
            BandPosition::Neutral => {}
        }

        let sr = &indicators.support_resistance;
        if current_price <= sr.support * 1.01 {
            votes.push(Vote::long(WEIGHT_SUPPORT_RESISTANCE));
        } else if current_price >= sr.resistance * 0.99 {
            votes.push(Vote::short(WEIGHT_SUPPORT_RESISTANCE));
        }

        if indicators.trend.is_bullish() {
            votes.push(Vote::long(WEIGHT_TREND));
        } else if indicators.trend.is_bearish() {
            votes.push(Vote::short(WEIGHT_TREND));
        }

        let long_count = votes
            .iter()
            .filter(|v| v.direction == SignalDirection::Long)
            .count();
        let short_count = votes
            .iter()
            .filter(|v| v.direction == SignalDirection::Short)
            .count();

        // Majority by vote count, not by weight. Only the winning side's
        // weights contribute to confidence; a tie (including zero votes) is
        // NEUTRAL at a fixed confidence.
        let (direction, confidence) = if long_count > short_count {
            (
                SignalDirection::Long,
                Self::weight_sum(&votes, SignalDirection::Long).min(CONFIDENCE_CAP),
            )
        } else if short_count > long_count {
            (
                SignalDirection::Short,
                Self::weight_sum(&votes, SignalDirection::Short).min(CONFIDENCE_CAP),
            )
        } else {
            (SignalDirection::Neutral, NEUTRAL_CONFIDENCE)
        };

        debug!(
            long_votes = long_count,
            short_votes = short_count,
            neutral_weight,
            direction = ?direction,
            confidence,
            "signal vote tally"
        );

        let stop_distance = indicators.atr * STOP_ATR_MULTIPLE;
        let target_distance = stop_distance * TARGET_STOP_MULTIPLE;

        let entry = current_price;
        // NEUTRAL keeps the LONG orientation for its levels.
        let (stop_loss, take_profit) = match direction {
            SignalDirection::Short => (entry + stop_distance, entry - target_distance),
            _ => (entry - stop_distance, entry + target_distance),
        };

        let risk_reward = if stop_distance > 0.0 {
            target_distance / stop_distance
        } else {
            TARGET_STOP_MULTIPLE
        };

        Signal {
            direction,
            confidence: math::round_to(confidence, 1),
            entry: math::round_to(entry, 6),
            take_profit: math::round_to(take_profit, 6),
            stop_loss: math::round_to(stop_loss, 6),
            risk_reward: math::round_to(risk_reward, 2),
            atr: indicators.atr,
        }
    }

    fn weight_sum(votes: &[Vote], direction: SignalDirection) -> f64 {
        votes
            .iter()
            .filter(|v| v.direction == direction)
            .map(|v| v.weight)
            .sum()
    }
}
