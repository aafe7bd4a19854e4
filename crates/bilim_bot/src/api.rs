//! HTTP API exposing health and cycle metrics.

use crate::CycleMetrics;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use bilim_error::{BilimResult, HttpError};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// API state containing the metrics collector.
#[derive(Clone)]
pub struct ApiState {
    metrics: CycleMetrics,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(metrics: CycleMetrics) -> Self {
        Self { metrics }
    }
}

/// Creates the health and metrics router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Binds `port` on all interfaces and serves the API in a background task.
///
/// # Errors
///
/// Returns error if the port cannot be bound.
pub async fn spawn_api(port: u16, state: ApiState) -> BilimResult<SocketAddr> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind API port {}: {}", port, e)))?;
    let addr = listener
        .local_addr()
        .map_err(|e| HttpError::new(format!("Failed to read API address: {}", e)))?;

    info!(%addr, "Serving health and metrics API");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, create_router(state)).await {
            error!(error = %e, "Health API stopped");
        }
    });

    Ok(addr)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Get current metrics snapshot.
async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}
