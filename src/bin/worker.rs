//! Pairscope Worker
//!
//! Drains the update/news/cleanup queues and runs the cron scheduler that
//! enqueues the periodic bulk-update cycle. Can be run as a separate
//! process/instance from the API server.

use apalis_redis::RedisStorage;
use dotenvy::dotenv;
use pairscope::config;
use pairscope::core::runtime::{RuntimeConfig, UpdateRuntime};
use pairscope::core::scheduler::UpdateScheduler;
use pairscope::db::AnalysisDatabase;
use pairscope::jobs::context::JobContext;
use pairscope::jobs::types::{CleanupJob, RefreshNewsJob, UpdatePairJob};
use pairscope::logging;
use pairscope::metrics::Metrics;
use pairscope::services::analyzer::PairAnalyzer;
use pairscope::services::news::NewsFetcher;
use pairscope::services::price_feed::DataFetcher;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    logging::init_logging();

    let update_interval: u64 = env::var("UPDATE_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or(0);

    let environment = config::get_environment();
    info!("Starting Pairscope Worker");
    info!(environment = %environment, "Environment");

    if update_interval == 0 {
        return Err("UPDATE_INTERVAL_SECONDS must be > 0 for worker".into());
    }

    let metrics = Arc::new(Metrics::new()?);

    info!("Initializing QuestDB connection...");
    let database = match AnalysisDatabase::new().await {
        Ok(db) => {
            info!("QuestDB connected");
            metrics.database_connected.set(1.0);
            Arc::new(db)
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to QuestDB");
            return Err(format!("QuestDB connection required for worker: {}", e).into());
        }
    };

    let symbols = config::all_pairs();
    let concurrency: usize = env::var("WORKER_CONCURRENCY")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(|| symbols.len().max(1));

    info!(concurrency = concurrency, "Worker concurrency: {}", concurrency);
    info!(
        interval = update_interval,
        "Bulk update: every {} seconds", update_interval
    );
    info!(symbols = ?symbols, "Tracked pairs: {}", symbols.join(", "));

    let runtime_config = RuntimeConfig {
        update_interval_seconds: update_interval,
        symbols: symbols.clone(),
    };

    info!("Initializing market data feeds...");
    let feed = Arc::new(DataFetcher::from_env());
    let analyzer = Arc::new(PairAnalyzer::new(feed, database.clone()).with_metrics(metrics.clone()));
    let news = Arc::new(NewsFetcher::from_env());

    info!("Initializing Apalis Redis storage...");
    let redis_url = config::get_redis_url();
    let conn = apalis_redis::connect(redis_url.clone()).await?;
    let update_storage: Arc<RedisStorage<UpdatePairJob>> =
        Arc::new(RedisStorage::new(conn.clone()));
    let news_storage: Arc<RedisStorage<RefreshNewsJob>> =
        Arc::new(RedisStorage::new(conn.clone()));
    let cleanup_storage: Arc<RedisStorage<CleanupJob>> = Arc::new(RedisStorage::new(conn));
    info!("Apalis Redis storage initialized");

    let job_context = Arc::new(JobContext::new(
        analyzer,
        news,
        database.clone(),
        Some(metrics.clone()),
    ));

    info!("Starting Apalis workers...");
    let runtime = UpdateRuntime::new(
        runtime_config.clone(),
        job_context,
        update_storage.clone(),
        news_storage.clone(),
        cleanup_storage.clone(),
    )
    .with_concurrency(concurrency);
    let worker_handles = runtime
        .start_workers()
        .await
        .map_err(|e| format!("Failed to start workers: {}", e))?;

    info!("Starting update scheduler...");
    let scheduler = UpdateScheduler::new(
        update_storage,
        news_storage,
        cleanup_storage,
        symbols,
        update_interval,
    )
    .map_err(|e| format!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| format!("Failed to start scheduler: {}", e))?;

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scheduler.stop().await;
            for handle in worker_handles {
                handle.abort();
            }
            info!("Worker stopped");
        }
    }

    Ok(())
}
