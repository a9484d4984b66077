//! Pair analyzer: the fetch -> analyze -> store flow
//!
//! This is the orchestration around the analysis core: it gathers a price
//! series (live feed first, stored history as fallback), runs the indicator
//! engine and signal fuser, persists the result and attaches relevant news.
//! The degenerate INSUFFICIENT_DATA analysis for short histories is decided
//! here, not in the engine.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::config;
use crate::db::AnalysisDatabase;
use crate::indicators::{compute_indicators, MIN_HISTORY};
use crate::metrics::Metrics;
use crate::models::analysis::PairAnalysis;
use crate::models::candle::Candle;
use crate::models::signal::Signal;
use crate::services::price_feed::PriceFeed;
use crate::signals::SignalFuser;

/// Window of stored history used when the live feed comes up short (7 days).
const HISTORY_FALLBACK_HOURS: i64 = 168;
/// Days of history requested from the live feed.
const HISTORY_DAYS: u32 = 7;
/// How much news to attach to an analysis.
const NEWS_WINDOW_HOURS: i64 = 24;
const NEWS_LIMIT: usize = 5;

pub struct PairAnalyzer {
    feed: Arc<dyn PriceFeed + Send + Sync>,
    database: Arc<AnalysisDatabase>,
    metrics: Option<Arc<Metrics>>,
}

impl PairAnalyzer {
    pub fn new(feed: Arc<dyn PriceFeed + Send + Sync>, database: Arc<AnalysisDatabase>) -> Self {
        Self {
            feed,
            database,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Analyze one pair end to end and return the stored analysis.
    pub async fn analyze(
        &self,
        symbol: &str,
    ) -> Result<PairAnalysis, Box<dyn std::error::Error + Send + Sync>> {
        if !config::is_valid_symbol(symbol) {
            return Err(format!("invalid symbol: {}", symbol).into());
        }

        let start = Instant::now();
        let kind = config::pair_kind(symbol);
        let quote = self.feed.fetch_quote(symbol).await?;

        let mut history = match self.feed.fetch_history(symbol, HISTORY_DAYS).await {
            Ok(history) => history,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "feed history unavailable");
                Vec::new()
            }
        };

        if history.len() < MIN_HISTORY {
            history = match self
                .database
                .get_price_history(symbol, HISTORY_FALLBACK_HOURS)
                .await
            {
                Ok(stored) => stored,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "stored history unavailable");
                    Vec::new()
                }
            };
        }

        // Record the quote as a price point so history accumulates even for
        // pairs whose feeds expose no usable candles.
        let point = Candle::flat(quote.price, quote.volume, Utc::now());
        if let Err(e) = self.database.store_price_point(symbol, &point).await {
            warn!(symbol = %symbol, error = %e, "failed to store price point");
        }

        let mut analysis = if history.len() < MIN_HISTORY {
            info!(
                symbol = %symbol,
                points = history.len(),
                "not enough history, producing degenerate analysis"
            );
            PairAnalysis {
                symbol: symbol.to_string(),
                kind,
                price: quote.price,
                change_24h: quote.change_24h,
                volume: quote.volume,
                technical: None,
                signal: Signal::insufficient_data(quote.price),
                timestamp: Utc::now(),
                source: Some(quote.source.clone()),
                news: Vec::new(),
            }
        } else {
            let indicators = compute_indicators(history)?;
            let signal = SignalFuser::generate_signal(&indicators, quote.price);
            PairAnalysis {
                symbol: symbol.to_string(),
                kind,
                price: quote.price,
                change_24h: quote.change_24h,
                volume: quote.volume,
                technical: Some(indicators),
                signal,
                timestamp: Utc::now(),
                source: Some(quote.source.clone()),
                news: Vec::new(),
            }
        };

        self.database.store_analysis(&analysis).await?;

        match self
            .database
            .get_pair_news(symbol, NEWS_WINDOW_HOURS, NEWS_LIMIT)
            .await
        {
            Ok(news) => analysis.news = news,
            Err(e) => warn!(symbol = %symbol, error = %e, "failed to load pair news"),
        }

        if let Some(ref metrics) = self.metrics {
            metrics
                .analysis_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        info!(
            symbol = %symbol,
            direction = ?analysis.signal.direction,
            confidence = analysis.signal.confidence,
            "pair analysis complete"
        );

        Ok(analysis)
    }
}
