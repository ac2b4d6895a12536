//! Health, readiness and metrics endpoints.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    /// Registered stations, once the registry is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stations: Option<usize>,
    /// Catalog entries, once the catalog is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<usize>,
    /// Snapshot currently displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - 503 until the registry and the catalog are loaded
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let stations = state.registry().await.map(|r| r.len());
    let snapshots = state.listing().await.map(|l| l.len());
    let ready = stations.is_some() && snapshots.is_some();

    let response = ReadyResponse {
        ready,
        stations,
        snapshots,
        current: state.features.current().snapshot().map(str::to_string),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response)).into_response()
}

/// GET /metrics - Prometheus exposition
pub async fn metrics_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(prometheus): Extension<PrometheusHandle>,
) -> Response {
    state.metrics.record_icon_cache_stats(&state.icon_cache.stats());
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        prometheus.render(),
    )
        .into_response()
}

/// GET /api/metrics - JSON summary of service counters
pub async fn api_metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    Json(state.metrics.snapshot(state.icon_cache.stats())).into_response()
}
