//! Apalis worker setup for the bulk-update workflow

use apalis::prelude::*;
use apalis_redis::RedisStorage;
use std::sync::Arc;
use tracing::info;

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::{CleanupJob, RefreshNewsJob, UpdatePairJob};

/// Configuration for the worker runtime.
#[derive(Clone)]
pub struct RuntimeConfig {
    pub update_interval_seconds: u64,
    pub symbols: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            update_interval_seconds: 900,
            symbols: crate::config::all_pairs(),
        }
    }
}

/// Hosts the Apalis workers that drain the update, news and cleanup queues.
pub struct UpdateRuntime {
    _config: RuntimeConfig,
    job_context: Arc<JobContext>,
    update_storage: Arc<RedisStorage<UpdatePairJob>>,
    news_storage: Arc<RedisStorage<RefreshNewsJob>>,
    cleanup_storage: Arc<RedisStorage<CleanupJob>>,
    concurrency: usize,
}

impl UpdateRuntime {
    pub fn new(
        config: RuntimeConfig,
        job_context: Arc<JobContext>,
        update_storage: Arc<RedisStorage<UpdatePairJob>>,
        news_storage: Arc<RedisStorage<RefreshNewsJob>>,
        cleanup_storage: Arc<RedisStorage<CleanupJob>>,
    ) -> Self {
        let concurrency = config.symbols.len().max(1);
        Self {
            _config: config,
            job_context,
            update_storage,
            news_storage,
            cleanup_storage,
            concurrency,
        }
    }

    /// Set custom concurrency (default is number of symbols).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Start all workers and return handles for graceful shutdown.
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = Vec::new();

        info!(
            concurrency = self.concurrency,
            "UpdateRuntime: starting Apalis workers"
        );

        let update_storage = (*self.update_storage).clone();
        let job_context = self.job_context.clone();
        let update_handle = tokio::spawn(async move {
            let worker = WorkerBuilder::new("update-pair-worker")
                .data(job_context)
                .backend(update_storage)
                .build_fn(handlers::handle_update_pair);

            info!("UpdateRuntime: UpdatePairJob worker started");
            worker.run().await;
        });
        handles.push(update_handle);

        let news_storage = (*self.news_storage).clone();
        let job_context_news = self.job_context.clone();
        let news_handle = tokio::spawn(async move {
            let worker = WorkerBuilder::new("refresh-news-worker")
                .data(job_context_news)
                .backend(news_storage)
                .build_fn(handlers::handle_refresh_news);

            info!("UpdateRuntime: RefreshNewsJob worker started");
            worker.run().await;
        });
        handles.push(news_handle);

        let cleanup_storage = (*self.cleanup_storage).clone();
        let job_context_cleanup = self.job_context.clone();
        let cleanup_handle = tokio::spawn(async move {
            let worker = WorkerBuilder::new("cleanup-worker")
                .data(job_context_cleanup)
                .backend(cleanup_storage)
                .build_fn(handlers::handle_cleanup);

            info!("UpdateRuntime: CleanupJob worker started");
            worker.run().await;
        });
        handles.push(cleanup_handle);

        info!("UpdateRuntime: all workers started");
        Ok(handles)
    }
}
