//! Station data pipeline.
//!
//! Turns raw snapshot records into map features and per-station histories:
//!
//! - Enrichment: join status records with the station registry
//! - Feature building: GeoJSON points indexed by station id
//! - Feature cell: the current feature set, shared with icon rendering,
//!   with ticketed publication so stale loads are dropped
//! - Aggregation: offline reshaping of snapshot folders into one history
//!   file per station

pub mod aggregate;
pub mod cell;
pub mod enrich;
pub mod features;

// Re-exports
pub use aggregate::{aggregate, read_series, typed_series, AggregateReport, Aggregation, HistoricalSeries};
pub use cell::{FeatureCell, LoadTicket, PublishOutcome};
pub use enrich::{enrich, find_bikes_type, EnrichedStation};
pub use features::{FeatureSet, StationLayer};
