use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A degenerate bar where all four prices equal the quoted price. Used to
    /// append the latest quote to stored history.
    pub fn flat(price: f64, volume: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(price, price, price, price, volume, timestamp)
    }
}
