//! Job handlers for the bulk-update workflow

use apalis::prelude::*;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::jobs::context::JobContext;
use crate::jobs::types::{CleanupJob, RefreshNewsJob, UpdatePairJob};
use crate::services::news;

const PRICE_RETENTION_DAYS: i64 = 30;
const NEWS_RETENTION_DAYS: i64 = 7;

/// Handler for updating one pair.
///
/// Runs the full analyzer flow. Failures are returned so Apalis retries the
/// pair on its backoff schedule; one bad pair never blocks the rest of the
/// universe because each symbol is its own job.
pub async fn handle_update_pair(
    job: UpdatePairJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    debug!(symbol = %job.symbol, "UpdatePairJob: analyzing {}", job.symbol);

    match ctx.analyzer.analyze(&job.symbol).await {
        Ok(analysis) => {
            if let Some(ref metrics) = ctx.metrics {
                metrics.pair_updates_total.inc();
            }
            info!(
                symbol = %job.symbol,
                direction = ?analysis.signal.direction,
                confidence = analysis.signal.confidence,
                "UpdatePairJob: stored analysis for {}",
                job.symbol
            );
            Ok(())
        }
        Err(e) => {
            if let Some(ref metrics) = ctx.metrics {
                metrics.pair_update_failures_total.inc();
            }
            error!(symbol = %job.symbol, error = %e, "UpdatePairJob: analysis failed for {}", job.symbol);
            Err(e)
        }
    }
}

/// Handler for the news refresh job.
///
/// Fetches the latest articles, scores each one and stores it; duplicate
/// articles are skipped by the database layer.
pub async fn handle_refresh_news(
    _job: RefreshNewsJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let articles = ctx.news.fetch_market_news().await.map_err(|e| {
        error!(error = %e, "RefreshNewsJob: news fetch failed");
        Box::new(std::io::Error::other(format!("news fetch failed: {}", e)))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    if articles.is_empty() {
        debug!("RefreshNewsJob: no articles fetched");
        return Ok(());
    }

    let mut stored = 0;
    for raw in &articles {
        let scored = news::score_article(raw);
        match ctx.database.store_news(&scored).await {
            Ok(()) => {
                stored += 1;
                if let Some(ref metrics) = ctx.metrics {
                    metrics.news_articles_processed_total.inc();
                }
            }
            Err(e) => {
                error!(title = %scored.title, error = %e, "RefreshNewsJob: failed to store article");
            }
        }
    }

    ctx.database.update_last_run("news_refresh").await.ok();

    info!(
        fetched = articles.len(),
        stored = stored,
        "RefreshNewsJob: processed {} articles",
        articles.len()
    );
    Ok(())
}

/// Handler for the retention cleanup job.
pub async fn handle_cleanup(
    _job: CleanupJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let deleted_prices = ctx.database.cleanup_old_prices(PRICE_RETENTION_DAYS).await?;
    let deleted_news = ctx.database.cleanup_old_news(NEWS_RETENTION_DAYS).await?;

    ctx.database.update_last_run("cleanup").await?;

    info!(
        deleted_prices = deleted_prices,
        deleted_news = deleted_news,
        "CleanupJob: retention pass complete"
    );
    Ok(())
}
