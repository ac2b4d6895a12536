//! Error types for the station occupancy services.

use thiserror::Error;

/// Result type alias using StationError.
pub type StationResult<T> = Result<T, StationError>;

/// Primary error type for catalog, aggregation and icon operations.
#[derive(Debug, Error)]
pub enum StationError {
    // === Source Errors ===
    #[error("Snapshot catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Station registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    #[error("Failed to read source '{path}': {message}")]
    SourceReadError { path: String, message: String },

    // === Request Errors ===
    #[error("Unknown icon request: {0}")]
    UnknownIconRequest(String),

    #[error("Station not found: {0}")]
    StationNotFound(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Pipeline Errors ===
    #[error("Pipeline not ready: {0}")]
    NotReady(String),

    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl StationError {
    /// Shorthand for a source read failure.
    pub fn source_read(path: impl Into<String>, message: impl ToString) -> Self {
        StationError::SourceReadError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            StationError::InvalidParameter { .. } => 400,

            StationError::UnknownIconRequest(_)
            | StationError::StationNotFound(_)
            | StationError::SnapshotNotFound(_) => 404,

            StationError::CatalogUnavailable(_)
            | StationError::RegistryUnavailable(_)
            | StationError::SnapshotUnavailable(_)
            | StationError::NotReady(_) => 503,

            _ => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            StationError::CatalogUnavailable(_) => "CatalogUnavailable",
            StationError::RegistryUnavailable(_) => "RegistryUnavailable",
            StationError::SnapshotUnavailable(_) => "SnapshotUnavailable",
            StationError::SourceReadError { .. } => "SourceReadError",
            StationError::UnknownIconRequest(_) => "UnknownIconRequest",
            StationError::StationNotFound(_) => "StationNotFound",
            StationError::SnapshotNotFound(_) => "SnapshotNotFound",
            StationError::InvalidParameter { .. } => "InvalidParameter",
            StationError::NotReady(_) => "NotReady",
            StationError::RenderError(_) => "RenderError",
            StationError::WriteError(_) => "WriteError",
            StationError::InternalError(_) => "InternalError",
        }
    }
}

impl From<std::io::Error> for StationError {
    fn from(err: std::io::Error) -> Self {
        StationError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for StationError {
    fn from(err: serde_json::Error) -> Self {
        StationError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StationError::UnknownIconRequest("x".into()).http_status_code(), 404);
        assert_eq!(StationError::CatalogUnavailable("x".into()).http_status_code(), 503);
        assert_eq!(StationError::source_read("a.json", "boom").http_status_code(), 500);
        assert_eq!(
            StationError::InvalidParameter {
                param: "metric".into(),
                message: "nope".into()
            }
            .http_status_code(),
            400
        );
    }

    #[test]
    fn test_source_read_message() {
        let err = StationError::source_read("rawdata/index.txt", "not found");
        assert_eq!(
            err.to_string(),
            "Failed to read source 'rawdata/index.txt': not found"
        );
        assert_eq!(err.code(), "SourceReadError");
    }
}
