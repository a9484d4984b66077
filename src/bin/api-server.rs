//! Pairscope API Server
//!
//! HTTP API serving stored pair analyses, on-demand analysis and the
//! guarded bulk-update trigger. Stateless; can be horizontally scaled. The
//! worker runs as a separate process.

use dotenvy::dotenv;
use pairscope::core::http::start_server;
use pairscope::logging;
use std::env;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let environment = pairscope::config::get_environment();
    info!("Starting Pairscope API Server");
    info!(environment = %environment, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    info!("Note: the worker runs as a separate process. Use 'cargo run --bin worker' to start it.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
