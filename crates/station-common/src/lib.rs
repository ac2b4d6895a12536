//! Common types and utilities shared across the station occupancy services.

pub mod error;
pub mod geojson;
pub mod icon_id;
pub mod metric;
pub mod station;
pub mod time;

pub use error::{StationError, StationResult};
pub use geojson::{PointGeometry, StationFeature, StationFeatureCollection, StationProperties};
pub use icon_id::{IconId, IconRequest, StationLookup, ICON_NAMESPACE, ICON_SEPARATOR};
pub use metric::StationMetric;
pub use station::{BikeKind, BikesByType, RawStationStatus, Station, StationEnvelope};
pub use time::{parse_index, parse_snapshot_file_name, TimeParseError};
