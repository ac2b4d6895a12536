//! Storage abstractions for the station occupancy services.
//!
//! Provides:
//! - Text sources (local folder or HTTP) for indexes, snapshots and the registry
//! - The static station registry
//! - The snapshot catalog, including the synthetic live entry
//! - An in-memory LRU cache for encoded icons

pub mod catalog;
pub mod icon_cache;
pub mod registry;
pub mod source;

pub use catalog::{parse_listing, SnapshotCatalog, SnapshotFile};
pub use icon_cache::{IconCache, IconCacheSnapshot, IconCacheStats};
pub use registry::StationRegistry;
pub use source::{source_for, FsSource, HttpSource, SnapshotSource};
