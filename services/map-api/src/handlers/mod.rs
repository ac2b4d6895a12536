//! HTTP request handlers.
//!
//! - `health`: liveness, readiness, Prometheus and JSON metrics
//! - `snapshots`: catalog listing, reload and snapshot selection
//! - `stations`: current station layer and station detail
//! - `icons`: station icon PNGs
//! - `common`: error responses and query parsing

pub mod common;
pub mod health;
pub mod icons;
pub mod snapshots;
pub mod stations;

pub use health::{api_metrics_handler, health_handler, metrics_handler, ready_handler};
pub use icons::icon_handler;
pub use snapshots::{list_snapshots_handler, reload_snapshots_handler, select_snapshot_handler};
pub use stations::{station_detail_handler, stations_handler};
