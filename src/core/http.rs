//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use apalis::prelude::*;
use apalis_redis::RedisStorage;

use crate::config;
use crate::db::AnalysisDatabase;
use crate::jobs::types::{CleanupJob, RefreshNewsJob, UpdatePairJob};
use crate::metrics::Metrics;
use crate::models::analysis::PairKind;
use crate::services::analyzer::PairAnalyzer;
use crate::services::price_feed::DataFetcher;

/// Confidence threshold for the high-confidence listing.
const HIGH_CONFIDENCE_THRESHOLD: f64 = 75.0;

/// Redis-backed queues the API enqueues bulk-update work onto.
#[derive(Clone)]
pub struct JobQueues {
    pub update: RedisStorage<UpdatePairJob>,
    pub news: RedisStorage<RefreshNewsJob>,
    pub cleanup: RedisStorage<CleanupJob>,
}

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub database: Option<Arc<AnalysisDatabase>>,
    pub analyzer: Option<Arc<PairAnalyzer>>,
    pub queues: Option<JobQueues>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "pairscope-analysis-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct AnalysisQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsQuery {
    symbol: Option<String>,
    hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    symbol: String,
}

/// List the latest analysis per pair plus high-confidence signals and
/// system stats.
async fn list_analyses(
    State(state): State<AppState>,
    Query(params): Query<AnalysisQuery>,
) -> Result<Json<Value>, StatusCode> {
    let kind = match params.kind.as_deref() {
        Some(raw) => Some(PairKind::parse(raw).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };

    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let pairs = db.get_all_analyses(kind).await.map_err(|e| {
        error!(error = %e, "Failed to load analyses");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let high_confidence = db
        .get_high_confidence(HIGH_CONFIDENCE_THRESHOLD)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load high-confidence analyses");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let stats = db.get_system_stats().await.map_err(|e| {
        error!(error = %e, "Failed to load system stats");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!({
        "pairs": pairs,
        "high_confidence": high_confidence,
        "stats": stats,
    })))
}

/// Latest analysis for one symbol, with its recent news attached.
async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let analysis = db.get_analysis(&symbol).await.map_err(|e| {
        error!(error = %e, symbol = %symbol, "Failed to load analysis");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut analysis = analysis.ok_or(StatusCode::NOT_FOUND)?;

    match db.get_pair_news(&symbol, 24, 5).await {
        Ok(news) => analysis.news = news,
        Err(e) => warn!(error = %e, symbol = %symbol, "Failed to load pair news"),
    }

    Ok(Json(json!(analysis)))
}

/// Analyze a pair on demand.
async fn analyze_pair(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Value>, StatusCode> {
    if !config::is_valid_symbol(&request.symbol) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let analyzer = state
        .analyzer
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let analysis = analyzer.analyze(&request.symbol).await.map_err(|e| {
        error!(error = %e, symbol = %request.symbol, "On-demand analysis failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!(analysis)))
}

/// Recent news, optionally filtered by pair.
async fn list_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<Value>, StatusCode> {
    let db = state
        .database
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let hours = params.hours.unwrap_or(24);
    let news = match params.symbol {
        Some(symbol) => db.get_pair_news(&symbol, hours, 10).await,
        None => db.get_recent_news(20).await,
    }
    .map_err(|e| {
        error!(error = %e, "Failed to load news");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!({ "news": news })))
}

/// Enqueue a full update cycle: one job per tracked pair, then a news
/// refresh and a retention cleanup. Guarded by a bearer token so only the
/// external scheduler (or an operator) can trigger it.
async fn update_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let expected = format!("Bearer {}", config::get_update_secret());
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let queues = state.queues.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let symbols = config::all_pairs();
    let mut scheduled = 0;
    for symbol in &symbols {
        let mut storage = queues.update.clone();
        match storage
            .push(UpdatePairJob {
                symbol: symbol.clone(),
            })
            .await
        {
            Ok(_) => scheduled += 1,
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Failed to enqueue UpdatePairJob");
            }
        }
    }

    let mut news = queues.news.clone();
    let news_scheduled = news.push(RefreshNewsJob).await.is_ok();

    let mut cleanup = queues.cleanup.clone();
    let cleanup_scheduled = cleanup.push(CleanupJob).await.is_ok();

    info!(
        scheduled = scheduled,
        total = symbols.len(),
        "update-all: enqueued bulk update cycle"
    );

    Ok(Json(json!({
        "scheduled": scheduled,
        "total": symbols.len(),
        "news_scheduled": news_scheduled,
        "cleanup_scheduled": cleanup_scheduled,
    })))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/analysis", get(list_analyses))
        .route("/api/analysis/{symbol}", get(get_analysis))
        .route("/api/analyze", post(analyze_pair))
        .route("/api/news", get(list_news))
        .route("/api/update-all", post(update_all))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    // Database is optional: the API still serves health/metrics without it,
    // but the analysis endpoints return 503.
    let database = match AnalysisDatabase::new().await {
        Ok(db) => {
            info!("QuestDB connected for API server");
            metrics.database_connected.set(1.0);
            Some(Arc::new(db))
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to QuestDB - analysis endpoints will be unavailable");
            None
        }
    };

    let analyzer = database.as_ref().map(|db| {
        let feed = Arc::new(DataFetcher::from_env());
        Arc::new(PairAnalyzer::new(feed, db.clone()).with_metrics(metrics.clone()))
    });

    let queues = match apalis_redis::connect(config::get_redis_url()).await {
        Ok(conn) => {
            info!("Redis connected for API server");
            Some(JobQueues {
                update: RedisStorage::new(conn.clone()),
                news: RedisStorage::new(conn.clone()),
                cleanup: RedisStorage::new(conn),
            })
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Redis - update-all endpoint will be unavailable");
            None
        }
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        database,
        analyzer,
        queues,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
