//! Shared handler utilities.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use station_common::{StationError, StationMetric};

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Map a [`StationError`] to its status code and JSON body.
pub fn error_response(err: &StationError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorBody {
        code: err.code().to_string(),
        message: err.to_string(),
    };
    (status, Json(body)).into_response()
}

/// `?metric=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct MetricQuery {
    pub metric: Option<String>,
}

impl MetricQuery {
    /// Selected metric, `bikes_available` when absent.
    pub fn metric(&self) -> Result<StationMetric, StationError> {
        match self.metric.as_deref() {
            None | Some("") => Ok(StationMetric::default()),
            Some(name) => name.parse().map_err(|_| StationError::InvalidParameter {
                param: "metric".to_string(),
                message: format!("unknown metric '{}'", name),
            }),
        }
    }
}
