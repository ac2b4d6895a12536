//! Station occupancy map service.
//!
//! Serves the snapshot catalog, station layers built from the selected
//! snapshot and the station icons the map engine requests by id.

pub mod config;
pub mod handlers;
pub mod loader;
pub mod metrics;
pub mod state;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router. `/metrics` is only mounted with a Prometheus
/// handle.
pub fn router(state: Arc<AppState>, prometheus: Option<PrometheusHandle>) -> Router {
    let mut app = Router::new()
        // Health check
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        // Snapshot catalog
        .route("/api/snapshots", get(handlers::list_snapshots_handler))
        .route("/api/snapshots/reload", post(handlers::reload_snapshots_handler))
        .route(
            "/api/snapshots/:selector/stations",
            get(handlers::select_snapshot_handler),
        )
        // Current stations
        .route("/api/stations", get(handlers::stations_handler))
        .route("/api/stations/:id", get(handlers::station_detail_handler))
        // Icons
        .route("/icons/:id", get(handlers::icon_handler))
        // Application metrics API
        .route("/api/metrics", get(handlers::api_metrics_handler));

    if let Some(handle) = prometheus {
        app = app
            .route("/metrics", get(handlers::metrics_handler))
            .layer(Extension(handle));
    }

    app.layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
