//! Station layer and station detail endpoints.

use axum::{
    extract::{Extension, Path, Query},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use station_common::{StationError, StationFeature};

use super::common::{error_response, MetricQuery};
use crate::state::AppState;

/// Availability shown in a station's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available {
        bikes_available: u32,
        mechanical: u32,
        ebike: u32,
        docks: u32,
    },
    Unavailable,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StationDetail {
    pub snapshot: Option<String>,
    pub station_id: u64,
    pub station_name: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(flatten)]
    pub availability: Availability,
}

impl StationDetail {
    fn new(snapshot: Option<String>, feature: &StationFeature) -> Self {
        let props = &feature.properties;
        let availability = if props.is_functional {
            Availability::Available {
                bikes_available: props.bikes_available,
                mechanical: props.bikes_available_mechanical,
                ebike: props.bikes_available_ebike,
                docks: props.docks_available,
            }
        } else {
            Availability::Unavailable
        };

        Self {
            snapshot,
            station_id: props.station_id,
            station_name: props.station_name.clone(),
            lon: feature.geometry.lon(),
            lat: feature.geometry.lat(),
            availability,
        }
    }
}

/// GET /api/stations - Current station layer, without refetching
pub async fn stations_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MetricQuery>,
) -> Response {
    let metric = match query.metric() {
        Ok(metric) => metric,
        Err(e) => return error_response(&e),
    };

    let features = state.features.current();
    if features.snapshot().is_none() {
        return error_response(&StationError::NotReady("no snapshot loaded".to_string()));
    }
    Json(features.layer(metric)).into_response()
}

/// GET /api/stations/:id - One station of the current snapshot
pub async fn station_detail_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Response {
    let features = state.features.current();
    match features.get(&station_id) {
        Some(feature) => Json(StationDetail::new(
            features.snapshot().map(str::to_string),
            feature,
        ))
        .into_response(),
        None => error_response(&StationError::StationNotFound(station_id)),
    }
}
