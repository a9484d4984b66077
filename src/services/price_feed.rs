//! Price feed abstraction over external market data APIs
//!
//! The orchestration layer injects a [`PriceFeed`] into the analyzer; the
//! analysis core never touches the network. [`DataFetcher`] is the default
//! implementation, routing crypto symbols to CoinGecko and forex symbols to
//! the provider fallback chain.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::config;
use crate::models::analysis::PairKind;
use crate::models::candle::Candle;
use crate::services::coingecko::CoinGeckoFeed;
use crate::services::forex::ForexFeed;

/// Latest quote for a pair, with source attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub kind: PairKind,
    pub price: f64,
    pub change_24h: f64,
    pub volume: f64,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub enum FeedError {
    UnknownSymbol(String),
    MissingApiKey(&'static str),
    Http(reqwest::Error),
    Upstream(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::UnknownSymbol(symbol) => write!(f, "unknown symbol: {}", symbol),
            FeedError::MissingApiKey(api) => write!(f, "no API key configured for {}", api),
            FeedError::Http(e) => write!(f, "http error: {}", e),
            FeedError::Upstream(msg) => write!(f, "upstream error: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Http(e)
    }
}

/// Source of current prices and OHLCV history for the analyzer.
#[async_trait]
pub trait PriceFeed {
    async fn fetch_quote(&self, symbol: &str) -> Result<PriceQuote, FeedError>;

    /// Historical candles covering roughly the last `days` days. May return
    /// fewer points than the engine minimum; the analyzer falls back to
    /// stored history in that case.
    async fn fetch_history(&self, symbol: &str, days: u32) -> Result<Vec<Candle>, FeedError>;
}

/// Enforces a minimum interval between calls per upstream API.
///
/// Free tiers of the forex providers are tightly limited, so the feed
/// serializes its own calls rather than trusting upstream 429 handling.
pub struct RateLimiter {
    next_slot: Mutex<HashMap<&'static str, Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until a call to `api` is allowed, reserving the slot.
    pub async fn acquire(&self, api: &'static str, min_interval: Duration) {
        let delay = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let start = slots.get(api).copied().unwrap_or(now).max(now);
            slots.insert(api, start + min_interval);
            start - now
        };
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Default [`PriceFeed`] routing by pair kind.
pub struct DataFetcher {
    crypto: CoinGeckoFeed,
    forex: ForexFeed,
}

impl DataFetcher {
    pub fn new(crypto: CoinGeckoFeed, forex: ForexFeed) -> Self {
        Self { crypto, forex }
    }

    pub fn from_env() -> Self {
        Self::new(CoinGeckoFeed::new(), ForexFeed::from_env())
    }
}

#[async_trait]
impl PriceFeed for DataFetcher {
    async fn fetch_quote(&self, symbol: &str) -> Result<PriceQuote, FeedError> {
        if !config::is_valid_symbol(symbol) {
            return Err(FeedError::UnknownSymbol(symbol.to_string()));
        }
        match config::pair_kind(symbol) {
            PairKind::Crypto => self.crypto.fetch_quote(symbol).await,
            PairKind::Forex => self.forex.fetch_quote(symbol).await,
        }
    }

    async fn fetch_history(&self, symbol: &str, days: u32) -> Result<Vec<Candle>, FeedError> {
        if !config::is_valid_symbol(symbol) {
            return Err(FeedError::UnknownSymbol(symbol.to_string()));
        }
        match config::pair_kind(symbol) {
            PairKind::Crypto => self.crypto.fetch_history(symbol, days).await,
            PairKind::Forex => self.forex.fetch_history(symbol, days).await,
        }
    }
}
