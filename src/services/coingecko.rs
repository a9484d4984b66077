//! CoinGecko market data feed for crypto pairs

use std::collections::HashMap;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::analysis::PairKind;
use crate::models::candle::Candle;
use crate::services::price_feed::{FeedError, PriceQuote};

const COINGECKO_BASE: &str = "https://api.coingecko.com/api/v3";

/// Map trading symbols to CoinGecko coin ids.
fn coin_id(symbol: &str) -> Option<&'static str> {
    match symbol {
        "BTCUSDT" => Some("bitcoin"),
        "ETHUSDT" => Some("ethereum"),
        "ETCUSDT" => Some("ethereum-classic"),
        "SOLUSDT" => Some("solana"),
        "DOGEUSDT" => Some("dogecoin"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct CoinData {
    #[serde(default)]
    usd: f64,
    #[serde(default)]
    usd_24h_change: f64,
    #[serde(default)]
    usd_24h_vol: f64,
}

pub struct CoinGeckoFeed {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoFeed {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_BASE)
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, FeedError> {
        let value = (|| async {
            self.client
                .get(&url)
                .query(query)
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        })
        .retry(
            ExponentialBuilder::default()
                .with_min_delay(Duration::from_millis(250))
                .with_max_times(2),
        )
        .await?;
        Ok(value)
    }

    pub async fn fetch_quote(&self, symbol: &str) -> Result<PriceQuote, FeedError> {
        let id = coin_id(symbol).ok_or_else(|| FeedError::UnknownSymbol(symbol.to_string()))?;

        let url = format!("{}/simple/price", self.base_url);
        let data: HashMap<String, CoinData> = self
            .get_json(
                url,
                &[
                    ("ids", id),
                    ("vs_currencies", "usd"),
                    ("include_24hr_change", "true"),
                    ("include_24hr_vol", "true"),
                ],
            )
            .await?;

        let coin = data
            .get(id)
            .ok_or_else(|| FeedError::Upstream(format!("no data returned for {}", symbol)))?;

        Ok(PriceQuote {
            symbol: symbol.to_string(),
            kind: PairKind::Crypto,
            price: coin.usd,
            change_24h: coin.usd_24h_change,
            volume: coin.usd_24h_vol,
            source: "coingecko".to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Fetch OHLC history. CoinGecko's OHLC endpoint carries no volume, so
    /// every candle reports volume 0.
    pub async fn fetch_history(&self, symbol: &str, days: u32) -> Result<Vec<Candle>, FeedError> {
        let id = coin_id(symbol).ok_or_else(|| FeedError::UnknownSymbol(symbol.to_string()))?;

        let url = format!("{}/coins/{}/ohlc", self.base_url, id);
        let days_param = days.to_string();
        let rows: Vec<[f64; 5]> = self
            .get_json(url, &[("vs_currency", "usd"), ("days", days_param.as_str())])
            .await?;

        let candles = rows
            .iter()
            .filter_map(|row| {
                let timestamp = DateTime::<Utc>::from_timestamp((row[0] / 1000.0) as i64, 0)?;
                Some(Candle::new(row[1], row[2], row[3], row[4], 0.0, timestamp))
            })
            .collect();

        Ok(candles)
    }
}

impl Default for CoinGeckoFeed {
    fn default() -> Self {
        Self::new()
    }
}
