//! Indicator result types
//!
//! Field names and nesting are part of the stored/served document shape and
//! must stay stable for downstream consumers.

use serde::{Deserialize, Serialize};

/// Full set of indicators computed from one price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: f64,
    pub macd: MacdIndicator,
    pub bollinger: BollingerIndicator,
    pub atr: f64,
    pub support_resistance: SupportResistance,
    pub trend: TrendDirection,
    pub volume: VolumeAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: MacdTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdTrend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub position: BandPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandPosition {
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    StrongUptrend,
    Uptrend,
    StrongDowntrend,
    Downtrend,
    Sideways,
    InsufficientData,
}

impl TrendDirection {
    pub fn is_bullish(&self) -> bool {
        matches!(self, TrendDirection::StrongUptrend | TrendDirection::Uptrend)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(
            self,
            TrendDirection::StrongDowntrend | TrendDirection::Downtrend
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeAnalysis {
    pub current: f64,
    pub average: f64,
    pub ratio: f64,
    pub status: VolumeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeStatus {
    High,
    Normal,
    Low,
}
