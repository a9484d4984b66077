//! Cron-based scheduler for the bulk-update cycle
//!
//! Every tick enqueues one UpdatePairJob per tracked symbol, followed by a
//! news refresh and a retention cleanup. The API's update-all endpoint
//! enqueues the same jobs on demand.

use apalis::prelude::*;
use apalis_redis::RedisStorage;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::jobs::types::{CleanupJob, RefreshNewsJob, UpdatePairJob};

/// Convert an update interval into the six-field cron schedule the
/// scheduler ticks on. A zero interval is refused rather than treated as
/// "as fast as possible".
pub fn cron_schedule(
    interval_seconds: u64,
) -> Result<Schedule, Box<dyn std::error::Error + Send + Sync>> {
    if interval_seconds == 0 {
        return Err("Scheduler disabled: interval_seconds is 0".into());
    }

    // Cron format: second minute hour day month weekday
    let cron_expr = if interval_seconds >= 60 {
        let minutes = interval_seconds / 60;
        format!("0 */{} * * * *", minutes)
    } else {
        format!("*/{} * * * * *", interval_seconds)
    };

    Schedule::from_str(&cron_expr).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Invalid cron expression '{}': {}", cron_expr, e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })
}

pub struct UpdateScheduler {
    update_storage: Arc<RedisStorage<UpdatePairJob>>,
    news_storage: Arc<RedisStorage<RefreshNewsJob>>,
    cleanup_storage: Arc<RedisStorage<CleanupJob>>,
    symbols: Vec<String>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl UpdateScheduler {
    /// Create a scheduler ticking every `interval_seconds` (0 is refused).
    pub fn new(
        update_storage: Arc<RedisStorage<UpdatePairJob>>,
        news_storage: Arc<RedisStorage<RefreshNewsJob>>,
        cleanup_storage: Arc<RedisStorage<CleanupJob>>,
        symbols: Vec<String>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = cron_schedule(interval_seconds)?;

        info!(
            interval = interval_seconds,
            symbols = ?symbols,
            "UpdateScheduler: created with interval {}s",
            interval_seconds
        );

        Ok(Self {
            update_storage,
            news_storage,
            cleanup_storage,
            symbols,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let update_storage = self.update_storage.clone();
        let news_storage = self.news_storage.clone();
        let cleanup_storage = self.cleanup_storage.clone();
        let symbols = self.symbols.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("UpdateScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!(
                    symbol_count = symbols.len(),
                    "UpdateScheduler: cron tick, enqueuing update cycle"
                );

                for symbol in &symbols {
                    let job = UpdatePairJob {
                        symbol: symbol.clone(),
                    };
                    let mut storage = (*update_storage).clone();
                    match storage.push(job).await {
                        Ok(_) => {
                            debug!(symbol = %symbol, "UpdateScheduler: enqueued UpdatePairJob for {}", symbol);
                        }
                        Err(e) => {
                            error!(
                                symbol = %symbol,
                                error = %e,
                                "UpdateScheduler: failed to enqueue UpdatePairJob for {}",
                                symbol
                            );
                        }
                    }
                }

                let mut news = (*news_storage).clone();
                if let Err(e) = news.push(RefreshNewsJob).await {
                    error!(error = %e, "UpdateScheduler: failed to enqueue RefreshNewsJob");
                }

                let mut cleanup = (*cleanup_storage).clone();
                if let Err(e) = cleanup.push(CleanupJob).await {
                    error!(error = %e, "UpdateScheduler: failed to enqueue CleanupJob");
                }
            }
        });

        {
            let mut h = handle_arc.write().await;
            *h = Some(handle);
        }

        info!("UpdateScheduler: started successfully");
        Ok(())
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("UpdateScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
