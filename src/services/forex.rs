//! Forex market data feed with a provider fallback chain
//!
//! Quote priority: Polygon (best real-time coverage), then EODHD, then
//! Alpha Vantage. History comes from EODHD hourly bars. Every provider is
//! optional; a missing key just skips that link in the chain.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::config;
use crate::models::analysis::PairKind;
use crate::models::candle::Candle;
use crate::services::price_feed::{FeedError, PriceQuote, RateLimiter};

const POLYGON_BASE: &str = "https://api.polygon.io";
const EODHD_BASE: &str = "https://eodhistoricaldata.com";
const ALPHA_VANTAGE_BASE: &str = "https://www.alphavantage.co";

// Minimum spacing between calls, sized to the providers' free tiers.
const POLYGON_INTERVAL: Duration = Duration::from_secs(12);
const EODHD_INTERVAL: Duration = Duration::from_secs(5);
const ALPHA_VANTAGE_INTERVAL: Duration = Duration::from_secs(13);

#[derive(Debug, Deserialize)]
struct PolygonAgg {
    #[serde(default)]
    o: f64,
    #[serde(default)]
    c: f64,
    #[serde(default)]
    v: f64,
}

#[derive(Debug, Deserialize)]
struct PolygonResponse {
    #[serde(rename = "resultsCount", default)]
    results_count: i64,
    #[serde(default)]
    results: Vec<PolygonAgg>,
}

#[derive(Debug, Deserialize)]
struct EodhdRealTime {
    #[serde(default)]
    code: String,
    #[serde(default)]
    close: f64,
    #[serde(default)]
    change_p: f64,
}

#[derive(Debug, Deserialize)]
struct EodhdBar {
    #[serde(default)]
    date: String,
    #[serde(default)]
    open: f64,
    #[serde(default)]
    high: f64,
    #[serde(default)]
    low: f64,
    #[serde(default)]
    close: f64,
    #[serde(default)]
    volume: f64,
}

pub struct ForexFeed {
    client: reqwest::Client,
    limiter: RateLimiter,
    polygon_key: Option<String>,
    eodhd_key: Option<String>,
    alpha_vantage_key: Option<String>,
    polygon_base: String,
    eodhd_base: String,
    alpha_vantage_base: String,
}

impl ForexFeed {
    pub fn new(
        polygon_key: Option<String>,
        eodhd_key: Option<String>,
        alpha_vantage_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: RateLimiter::new(),
            polygon_key,
            eodhd_key,
            alpha_vantage_key,
            polygon_base: POLYGON_BASE.to_string(),
            eodhd_base: EODHD_BASE.to_string(),
            alpha_vantage_base: ALPHA_VANTAGE_BASE.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            config::polygon_key(),
            config::eodhd_key(),
            config::alpha_vantage_key(),
        )
    }

    pub fn with_polygon_base(mut self, base: impl Into<String>) -> Self {
        self.polygon_base = base.into();
        self
    }

    pub fn with_eodhd_base(mut self, base: impl Into<String>) -> Self {
        self.eodhd_base = base.into();
        self
    }

    pub fn with_alpha_vantage_base(mut self, base: impl Into<String>) -> Self {
        self.alpha_vantage_base = base.into();
        self
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

    async fn fetch_polygon(&self, pair: &str) -> Result<PriceQuote, FeedError> {
        let key = self
            .polygon_key
            .clone()
            .ok_or(FeedError::MissingApiKey("polygon"))?;
        self.limiter.acquire("polygon", POLYGON_INTERVAL).await;

        let yesterday = (Utc::now() - chrono::Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        let url = format!(
            "{}/v2/aggs/ticker/C:{}/range/1/hour/{}/{}",
            self.polygon_base, pair, yesterday, yesterday
        );

        let response: PolygonResponse = self.get_json(url, &[("apiKey", key.as_str())]).await?;
        if response.results_count == 0 || response.results.is_empty() {
            return Err(FeedError::Upstream(format!(
                "polygon returned no results for {}",
                pair
            )));
        }

        let first = &response.results[0];
        let latest = &response.results[response.results.len() - 1];
        let change_24h = if first.o != 0.0 {
            (latest.c - first.o) / first.o * 100.0
        } else {
            0.0
        };

        Ok(PriceQuote {
            symbol: pair.to_string(),
            kind: PairKind::Forex,
            price: latest.c,
            change_24h,
            volume: latest.v,
            source: "polygon".to_string(),
            timestamp: Utc::now(),
        })
    }

    async fn fetch_eodhd(&self, pair: &str) -> Result<PriceQuote, FeedError> {
        let key = self
            .eodhd_key
            .clone()
            .ok_or(FeedError::MissingApiKey("eodhd"))?;
        self.limiter.acquire("eodhd", EODHD_INTERVAL).await;

        let url = format!("{}/api/real-time/{}.FOREX", self.eodhd_base, pair);
        let quote: EodhdRealTime = self
            .get_json(url, &[("api_token", key.as_str()), ("fmt", "json")])
            .await?;

        if quote.code.is_empty() {
            return Err(FeedError::Upstream(format!(
                "eodhd returned no quote for {}",
                pair
            )));
        }

        Ok(PriceQuote {
            symbol: pair.to_string(),
            kind: PairKind::Forex,
            price: quote.close,
            change_24h: quote.change_p,
            volume: 0.0,
            source: "eodhd".to_string(),
            timestamp: Utc::now(),
        })
    }

    async fn fetch_alpha_vantage(&self, pair: &str) -> Result<PriceQuote, FeedError> {
        let key = self
            .alpha_vantage_key
            .clone()
            .ok_or(FeedError::MissingApiKey("alphavantage"))?;
        if pair.len() < 6 {
            return Err(FeedError::UnknownSymbol(pair.to_string()));
        }
        self.limiter
            .acquire("alphavantage", ALPHA_VANTAGE_INTERVAL)
            .await;

        let url = format!("{}/query", self.alpha_vantage_base);
        let value: serde_json::Value = self
            .get_json(
                url,
                &[
                    ("function", "CURRENCY_EXCHANGE_RATE"),
                    ("from_currency", &pair[..3]),
                    ("to_currency", &pair[3..6]),
                    ("apikey", key.as_str()),
                ],
            )
            .await?;

        let price = value
            .get("Realtime Currency Exchange Rate")
            .and_then(|rate| rate.get("5. Exchange Rate"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| {
                FeedError::Upstream(format!("alpha vantage returned no rate for {}", pair))
            })?;

        Ok(PriceQuote {
            symbol: pair.to_string(),
            kind: PairKind::Forex,
            price,
            change_24h: 0.0,
            volume: 0.0,
            source: "alphavantage".to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Quote with fallback: Polygon, then EODHD, then Alpha Vantage.
    pub async fn fetch_quote(&self, pair: &str) -> Result<PriceQuote, FeedError> {
        match self.fetch_polygon(pair).await {
            Ok(quote) => return Ok(quote),
            Err(e) => warn!(pair = %pair, error = %e, "polygon quote failed, falling back"),
        }
        match self.fetch_eodhd(pair).await {
            Ok(quote) => return Ok(quote),
            Err(e) => warn!(pair = %pair, error = %e, "eodhd quote failed, falling back"),
        }
        self.fetch_alpha_vantage(pair).await
    }

    /// Hourly history from EODHD.
    pub async fn fetch_history(&self, pair: &str, days: u32) -> Result<Vec<Candle>, FeedError> {
        let key = self
            .eodhd_key
            .clone()
            .ok_or(FeedError::MissingApiKey("eodhd"))?;
        self.limiter.acquire("eodhd", EODHD_INTERVAL).await;

        let to = Utc::now().format("%Y-%m-%d").to_string();
        let from = (Utc::now() - chrono::Duration::days(days as i64))
            .format("%Y-%m-%d")
            .to_string();

        let url = format!("{}/api/eod/{}.FOREX", self.eodhd_base, pair);
        let bars: Vec<EodhdBar> = self
            .get_json(
                url,
                &[
                    ("api_token", key.as_str()),
                    ("from", from.as_str()),
                    ("to", to.as_str()),
                    ("period", "h"),
                    ("fmt", "json"),
                ],
            )
            .await?;

        let candles = bars
            .iter()
            .filter_map(|bar| {
                let timestamp = parse_bar_date(&bar.date)?;
                Some(Candle::new(
                    bar.open, bar.high, bar.low, bar.close, bar.volume, timestamp,
                ))
            })
            .collect();

        Ok(candles)
    }
}

/// EODHD dates come as `YYYY-MM-DD HH:MM:SS` for intraday periods and plain
/// `YYYY-MM-DD` for daily bars.
fn parse_bar_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
