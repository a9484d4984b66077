//! Environment-backed configuration accessors
//!
//! All runtime configuration comes from environment variables (loaded from
//! `.env` by the binaries via `dotenvy`). The analysis core takes no
//! configuration at all; everything here belongs to the orchestration layer.

use std::env;

use crate::models::analysis::PairKind;

/// Crypto pairs tracked by the service (quote asset USDT).
pub const CRYPTO_PAIRS: &[&str] = &["BTCUSDT", "ETHUSDT", "ETCUSDT", "SOLUSDT", "DOGEUSDT"];

/// Forex pairs tracked by the service.
pub const FOREX_PAIRS: &[&str] = &["EURUSD", "GBPUSD", "USDJPY", "GBPJPY", "AUDUSD", "USDCAD"];

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub fn get_questdb_url() -> String {
    env::var("QUESTDB_URL").unwrap_or_else(|_| {
        "host=localhost port=8812 user=admin password=quest dbname=qdb".to_string()
    })
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// Shared secret guarding the bulk-update endpoint.
pub fn get_update_secret() -> String {
    env::var("UPDATE_SECRET_KEY").unwrap_or_else(|_| "default-secret".to_string())
}

pub fn alpha_vantage_key() -> Option<String> {
    env::var("ALPHA_VANTAGE_KEY").ok().filter(|k| !k.is_empty())
}

pub fn polygon_key() -> Option<String> {
    env::var("POLYGON_KEY").ok().filter(|k| !k.is_empty())
}

pub fn eodhd_key() -> Option<String> {
    env::var("EODHD_KEY").ok().filter(|k| !k.is_empty())
}

pub fn newsapi_key() -> Option<String> {
    env::var("NEWSAPI_KEY").ok().filter(|k| !k.is_empty())
}

/// Full symbol universe, crypto first.
pub fn all_pairs() -> Vec<String> {
    CRYPTO_PAIRS
        .iter()
        .chain(FOREX_PAIRS.iter())
        .map(|s| s.to_string())
        .collect()
}

pub fn is_valid_symbol(symbol: &str) -> bool {
    CRYPTO_PAIRS.contains(&symbol) || FOREX_PAIRS.contains(&symbol)
}

/// Pair kind is derived from the symbol: USDT-quoted pairs are crypto.
pub fn pair_kind(symbol: &str) -> PairKind {
    if symbol.contains("USDT") {
        PairKind::Crypto
    } else {
        PairKind::Forex
    }
}
