//! Stored pair-analysis documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::indicators::IndicatorSet;
use crate::models::news::NewsArticle;
use crate::models::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairKind {
    Crypto,
    Forex,
}

impl PairKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairKind::Crypto => "crypto",
            PairKind::Forex => "forex",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "crypto" => Some(PairKind::Crypto),
            "forex" => Some(PairKind::Forex),
            _ => None,
        }
    }
}

/// One complete analysis run for a trading pair. `technical` is absent when
/// the pair had too little history and the signal is the degenerate
/// INSUFFICIENT_DATA fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairAnalysis {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: PairKind,
    pub price: f64,
    pub change_24h: f64,
    pub volume: f64,
    pub technical: Option<IndicatorSet>,
    pub signal: Signal,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub news: Vec<NewsArticle>,
}

/// Overview counters served alongside the analysis listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_pairs: i64,
    pub crypto_pairs: i64,
    pub forex_pairs: i64,
    pub high_confidence_signals: i64,
    pub news_articles: i64,
    pub price_points: i64,
    pub last_update: Option<DateTime<Utc>>,
}
