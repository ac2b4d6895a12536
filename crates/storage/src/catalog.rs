//! Snapshot catalog: which point-in-time captures can be displayed.
//!
//! Historical snapshots are listed in a newline-delimited index file next to
//! the snapshot files themselves. A synthetic live entry, fetched from the
//! operator's live status endpoint, can be appended after them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use station_common::time::{self, SNAPSHOT_INDEX_FILE};
use station_common::{RawStationStatus, StationEnvelope, StationError, StationResult};

use crate::source::SnapshotSource;

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Location of the snapshot document, relative to its source.
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub is_live: bool,
}

impl SnapshotFile {
    /// Key identifying this snapshot in load requests and logs.
    pub fn key(&self) -> String {
        if self.is_live {
            format!("live@{}", self.timestamp.to_rfc3339())
        } else {
            time::date_label(&self.url).to_string()
        }
    }
}

/// Parse an index document into chronologically ordered snapshot entries.
///
/// The whole listing fails if any non-blank line does not follow the
/// `yyyy-MM-dd_HH:mm.json` pattern.
pub fn parse_listing(text: &str) -> StationResult<Vec<SnapshotFile>> {
    let mut files = time::parse_index(text)
        .into_iter()
        .map(|name| {
            let timestamp = time::parse_snapshot_file_name(&name)
                .map_err(|e| StationError::CatalogUnavailable(e.to_string()))?;
            Ok(SnapshotFile {
                url: name,
                timestamp,
                is_live: false,
            })
        })
        .collect::<StationResult<Vec<_>>>()?;

    files.sort_by_key(|f| f.timestamp);
    Ok(files)
}

#[derive(Clone)]
struct LiveEndpoint {
    source: Arc<dyn SnapshotSource>,
    location: String,
}

/// Lists snapshots and fetches their station records.
#[derive(Clone)]
pub struct SnapshotCatalog {
    source: Arc<dyn SnapshotSource>,
    index_location: String,
    live: Option<LiveEndpoint>,
}

impl SnapshotCatalog {
    /// Catalog reading `index.txt` and the snapshot files from `source`.
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            index_location: SNAPSHOT_INDEX_FILE.to_string(),
            live: None,
        }
    }

    /// Read the index from another location of the source.
    pub fn with_index_location(mut self, location: impl Into<String>) -> Self {
        self.index_location = location.into();
        self
    }

    /// Append a live entry fetched from `location` on `source`.
    pub fn with_live(mut self, source: Arc<dyn SnapshotSource>, location: impl Into<String>) -> Self {
        self.live = Some(LiveEndpoint {
            source,
            location: location.into(),
        });
        self
    }

    pub fn has_live(&self) -> bool {
        self.live.is_some()
    }

    /// List all snapshots, oldest first, with the live entry (timestamped
    /// now) last.
    ///
    /// Either the whole listing succeeds or this fails with
    /// [`StationError::CatalogUnavailable`].
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn list(&self) -> StationResult<Vec<SnapshotFile>> {
        let text = self
            .source
            .fetch_text(&self.index_location)
            .await
            .map_err(|e| StationError::CatalogUnavailable(e.to_string()))?;

        let mut files = parse_listing(&text)?;
        if let Some(live) = &self.live {
            files.push(SnapshotFile {
                url: live.location.clone(),
                timestamp: Utc::now(),
                is_live: true,
            });
        }

        info!(
            snapshots = files.len(),
            live = self.live.is_some(),
            "Listed snapshot catalog"
        );
        Ok(files)
    }

    /// Fetch and parse the station records of one snapshot.
    ///
    /// Any failure is [`StationError::SnapshotUnavailable`]: the caller keeps
    /// whatever it displayed before.
    #[instrument(skip(self, file), fields(snapshot = %file.key()))]
    pub async fn fetch_statuses(&self, file: &SnapshotFile) -> StationResult<Vec<RawStationStatus>> {
        let source = match (&self.live, file.is_live) {
            (Some(live), true) => &live.source,
            (None, true) => {
                return Err(StationError::SnapshotUnavailable(
                    "no live endpoint configured".to_string(),
                ))
            }
            (_, false) => &self.source,
        };

        let text = source
            .fetch_text(&file.url)
            .await
            .map_err(|e| StationError::SnapshotUnavailable(e.to_string()))?;

        StationEnvelope::parse(&text).map_err(|e| {
            StationError::SnapshotUnavailable(format!("Invalid snapshot {}: {}", file.url, e))
        })
    }
}
