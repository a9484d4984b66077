//! Job context for dependency injection

use std::sync::Arc;

use crate::db::AnalysisDatabase;
use crate::metrics::Metrics;
use crate::services::analyzer::PairAnalyzer;
use crate::services::news::NewsFetcher;

/// Context passed to job handlers via the Apalis `Data<T>` pattern.
///
/// Handlers only read from it: the analyzer wraps the price feed and
/// database, the news fetcher is shared, and metrics are optional so jobs
/// run the same with or without an exporter.
pub struct JobContext {
    pub analyzer: Arc<PairAnalyzer>,
    pub news: Arc<NewsFetcher>,
    pub database: Arc<AnalysisDatabase>,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(
        analyzer: Arc<PairAnalyzer>,
        news: Arc<NewsFetcher>,
        database: Arc<AnalysisDatabase>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            analyzer,
            news,
            database,
            metrics,
        }
    }
}
