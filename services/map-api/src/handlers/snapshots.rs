//! Snapshot catalog endpoints.

use axum::{
    extract::{Extension, Path, Query},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use ingestion::{PublishOutcome, StationLayer};
use station_common::StationError;
use storage::SnapshotFile;

use super::common::{error_response, MetricQuery};
use crate::loader::{self, SnapshotSelector};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub index: usize,
    pub key: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub is_live: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotListing {
    /// Key of the snapshot currently displayed.
    pub current: Option<String>,
    pub snapshots: Vec<SnapshotEntry>,
}

#[derive(Serialize)]
pub struct SelectionResponse {
    /// False when a newer selection superseded this one; `layer` is then
    /// not what `/api/stations` shows.
    pub published: bool,
    pub layer: StationLayer,
}

fn listing_response(state: &AppState, files: &[SnapshotFile]) -> Response {
    let snapshots = files
        .iter()
        .enumerate()
        .map(|(index, file)| SnapshotEntry {
            index,
            key: file.key(),
            url: file.url.clone(),
            timestamp: file.timestamp,
            is_live: file.is_live,
        })
        .collect();

    Json(SnapshotListing {
        current: state.features.current().snapshot().map(str::to_string),
        snapshots,
    })
    .into_response()
}

/// GET /api/snapshots - Catalog listing, oldest first
pub async fn list_snapshots_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.listing().await {
        Some(files) => listing_response(&state, &files),
        None => error_response(&StationError::CatalogUnavailable(
            "catalog has not been loaded".to_string(),
        )),
    }
}

/// POST /api/snapshots/reload - Refetch the registry (if missing) and the catalog
#[instrument(skip(state))]
pub async fn reload_snapshots_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    if state.registry().await.is_none() {
        if let Err(e) = loader::load_registry(&state).await {
            return error_response(&e);
        }
    }

    let files = match loader::load_catalog(&state).await {
        Ok(files) => files,
        Err(e) => {
            warn!(error = %e, "Catalog reload failed");
            return error_response(&e);
        }
    };
    info!(snapshots = files.len(), "Reloaded snapshot catalog");

    // nothing displayed yet: show the newest entry
    if state.features.current().snapshot().is_none() {
        if let Err(e) = loader::select_snapshot(&state, SnapshotSelector::Latest).await {
            warn!(error = %e, "Initial snapshot load failed");
        }
    }

    listing_response(&state, &files)
}

/// GET /api/snapshots/:selector/stations - Load a snapshot and return its layer
///
/// `selector` is an index into the listing or `latest`.
#[instrument(skip(state, query))]
pub async fn select_snapshot_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(selector): Path<String>,
    Query(query): Query<MetricQuery>,
) -> Response {
    let metric = match query.metric() {
        Ok(metric) => metric,
        Err(e) => return error_response(&e),
    };
    let selector: SnapshotSelector = match selector.parse() {
        Ok(selector) => selector,
        Err(e) => return error_response(&e),
    };

    match loader::select_snapshot(&state, selector).await {
        Ok(selection) => Json(SelectionResponse {
            published: selection.outcome == PublishOutcome::Applied,
            layer: selection.features.layer(metric),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
