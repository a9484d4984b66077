//! Prometheus metrics registry

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
    pub pair_updates_total: IntCounter,
    pub pair_update_failures_total: IntCounter,
    pub analysis_duration_seconds: Histogram,
    pub news_articles_processed_total: IntCounter,
    pub database_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let pair_updates_total = IntCounter::new(
            "pair_updates_total",
            "Number of pair analyses completed successfully",
        )?;
        let pair_update_failures_total = IntCounter::new(
            "pair_update_failures_total",
            "Number of pair analyses that failed",
        )?;
        let analysis_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "analysis_duration_seconds",
            "End-to-end duration of a single pair analysis",
        ))?;
        let news_articles_processed_total = IntCounter::new(
            "news_articles_processed_total",
            "Number of news articles scored and stored",
        )?;
        let database_connected =
            Gauge::new("database_connected", "1 when the QuestDB connection is up")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(pair_updates_total.clone()))?;
        registry.register(Box::new(pair_update_failures_total.clone()))?;
        registry.register(Box::new(analysis_duration_seconds.clone()))?;
        registry.register(Box::new(news_articles_processed_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            pair_updates_total,
            pair_update_failures_total,
            analysis_duration_seconds,
            news_articles_processed_total,
            database_connected,
        })
    }

    /// Render all registered metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
