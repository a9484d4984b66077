//! Trading signal types

use serde::{Deserialize, Serialize};

use crate::common::math;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    Long,
    Short,
    Neutral,
    InsufficientData,
}

/// One trading recommendation derived from an indicator set and the current
/// price. A fresh value object per computation; no persisted identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: SignalDirection,
    pub confidence: f64,
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub risk_reward: f64,
    pub atr: f64,
}

impl Signal {
    /// Degenerate signal for pairs with too little history. This is
    /// orchestration-layer policy, not engine behavior: the engine refuses
    /// short series outright and the caller falls back to this fixed shape
    /// (entry at the quote, +2%/-2% levels, 2:1 reward-risk).
    pub fn insufficient_data(price: f64) -> Self {
        Self {
            direction: SignalDirection::InsufficientData,
            confidence: 0.0,
            entry: math::round_to(price, 6),
            take_profit: math::round_to(price * 1.02, 6),
            stop_loss: math::round_to(price * 0.98, 6),
            risk_reward: 2.0,
            atr: 0.0,
        }
    }
}
