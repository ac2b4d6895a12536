//! Registry, catalog and snapshot loading.
//!
//! Selecting a snapshot fetches its station records, enriches them against
//! the registry, builds a feature set and publishes it to the shared cell.
//! Only the most recent selection is published; a slower earlier one that
//! finishes later is dropped.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use ingestion::{enrich, FeatureSet, PublishOutcome};
use station_common::{StationError, StationResult};
use storage::{SnapshotFile, StationRegistry};

use crate::state::AppState;

/// Which catalog entry to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSelector {
    /// The newest entry: the live one when configured.
    Latest,
    /// Position in the chronological listing.
    Index(usize),
}

impl FromStr for SnapshotSelector {
    type Err = StationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(SnapshotSelector::Latest);
        }
        s.parse().map(SnapshotSelector::Index).map_err(|_| StationError::InvalidParameter {
            param: "snapshot".to_string(),
            message: format!("expected an index or 'latest', got '{}'", s),
        })
    }
}

impl SnapshotSelector {
    pub fn pick<'a>(&self, files: &'a [SnapshotFile]) -> StationResult<&'a SnapshotFile> {
        let found = match self {
            SnapshotSelector::Latest => files.last(),
            SnapshotSelector::Index(i) => files.get(*i),
        };
        found.ok_or_else(|| {
            StationError::SnapshotNotFound(match self {
                SnapshotSelector::Latest => "catalog is empty".to_string(),
                SnapshotSelector::Index(i) => format!("no snapshot at index {} of {}", i, files.len()),
            })
        })
    }
}

/// Result of one snapshot selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub snapshot: SnapshotFile,
    pub outcome: PublishOutcome,
    /// Features built for `snapshot`, whether or not they were published.
    pub features: Arc<FeatureSet>,
}

/// Fetch the station registry and keep it in the state.
pub async fn load_registry(state: &AppState) -> StationResult<Arc<StationRegistry>> {
    let registry = StationRegistry::load(state.registry_source(), state.registry_location()).await?;
    let registry = Arc::new(registry);
    state.set_registry(registry.clone()).await;
    Ok(registry)
}

/// Refetch the catalog listing. A failure keeps the previous listing.
pub async fn load_catalog(state: &AppState) -> StationResult<Arc<Vec<SnapshotFile>>> {
    let listing = Arc::new(state.catalog.list().await?);
    state.set_listing(listing.clone()).await;
    Ok(listing)
}

/// Load `selector` and publish it unless a newer selection started meanwhile.
///
/// A failed fetch leaves the current features untouched.
pub async fn select_snapshot(state: &AppState, selector: SnapshotSelector) -> StationResult<Selection> {
    let listing = state
        .listing()
        .await
        .ok_or_else(|| StationError::CatalogUnavailable("catalog has not been loaded".to_string()))?;
    let registry = state
        .registry()
        .await
        .ok_or_else(|| StationError::RegistryUnavailable("registry has not been loaded".to_string()))?;

    let snapshot = selector.pick(&listing)?.clone();
    let ticket = state.features.begin(snapshot.key());
    let start = Instant::now();

    let statuses = match state.catalog.fetch_statuses(&snapshot).await {
        Ok(statuses) => statuses,
        Err(e) => {
            warn!(snapshot = %snapshot.key(), error = %e, "Snapshot load failed, keeping current features");
            state.metrics.record_snapshot_failure();
            return Err(e);
        }
    };

    let records = statuses.len();
    let enriched = enrich(statuses, &registry);
    let set = FeatureSet::build(&enriched).with_snapshot(snapshot.key());
    let stations = set.len();

    let outcome = state.features.publish(&ticket, set.clone());
    state.metrics.record_snapshot_load(outcome, start.elapsed(), stations);

    info!(
        snapshot = %snapshot.key(),
        records = records,
        stations = stations,
        published = outcome == PublishOutcome::Applied,
        duration_ms = start.elapsed().as_millis() as u64,
        "Loaded snapshot"
    );

    Ok(Selection {
        snapshot,
        outcome,
        features: Arc::new(set),
    })
}

/// Startup sequence: registry, catalog, then the newest snapshot.
///
/// Failures are logged and leave the service not ready; `POST
/// /api/snapshots/reload` retries.
pub async fn initialize(state: &AppState) {
    if let Err(e) = load_registry(state).await {
        error!(error = %e, "Failed to load station registry");
        return;
    }
    if let Err(e) = load_catalog(state).await {
        error!(error = %e, "Failed to load snapshot catalog");
        return;
    }
    if let Err(e) = select_snapshot(state, SnapshotSelector::Latest).await {
        error!(error = %e, "Failed to load the latest snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn file(hour: u32) -> SnapshotFile {
        SnapshotFile {
            url: format!("2021-01-01_{:02}:00.json", hour),
            timestamp: Utc.with_ymd_and_hms(2021, 1, 1, hour, 0, 0).unwrap(),
            is_live: false,
        }
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!("latest".parse::<SnapshotSelector>().unwrap(), SnapshotSelector::Latest);
        assert_eq!("3".parse::<SnapshotSelector>().unwrap(), SnapshotSelector::Index(3));
        let err = "-1".parse::<SnapshotSelector>().unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_selector_pick() {
        let files = vec![file(8), file(9), file(10)];
        assert_eq!(SnapshotSelector::Latest.pick(&files).unwrap().url, "2021-01-01_10:00.json");
        assert_eq!(SnapshotSelector::Index(0).pick(&files).unwrap().url, "2021-01-01_08:00.json");
        assert!(matches!(
            SnapshotSelector::Index(3).pick(&files),
            Err(StationError::SnapshotNotFound(_))
        ));
        assert!(SnapshotSelector::Latest.pick(&[]).is_err());
    }
}
