//! Test utilities for API server integration tests

use axum_test::TestServer;
use pairscope::core::http::{create_router, AppState, HealthStatus};
use pairscope::metrics::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Test helper for API server integration tests.
///
/// Runs the router without database, analyzer or queues: endpoints that need
/// them are expected to degrade to 503 rather than panic.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let state = AppState {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            database: None,
            analyzer: None,
            queues: None,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self { server, metrics }
    }
}
