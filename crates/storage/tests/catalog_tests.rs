//! Catalog and registry tests against a scratch snapshot folder.

use std::sync::Arc;

use station_common::StationError;
use storage::{FsSource, SnapshotCatalog, StationRegistry};
use test_utils::{paris_registry, status_json, status_without_ebike, SnapshotFolder};

fn catalog_for(folder: &SnapshotFolder) -> SnapshotCatalog {
    SnapshotCatalog::new(Arc::new(FsSource::new(folder.path())))
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_orders_snapshots_chronologically() {
    let mut folder = SnapshotFolder::new();
    folder.add_snapshot("2024-01-01_09:00", vec![status_json(123, 7, 0, 3)]);
    folder.add_snapshot("2024-01-01_08:00", vec![status_json(123, 3, 0, 7)]);

    let files = catalog_for(&folder).list().await.unwrap();
    let urls: Vec<&str> = files.iter().map(|f| f.url.as_str()).collect();
    assert_eq!(urls, vec!["2024-01-01_08:00.json", "2024-01-01_09:00.json"]);
    assert!(files.iter().all(|f| !f.is_live));
}

#[tokio::test]
async fn test_live_entry_is_appended_last() {
    let mut folder = SnapshotFolder::new();
    folder.add_snapshot("2024-01-01_08:00", vec![status_json(123, 3, 0, 7)]);
    folder.write_raw("live.json", &test_utils::envelope(vec![status_json(123, 1, 1, 1)]));

    let source = Arc::new(FsSource::new(folder.path()));
    let catalog = SnapshotCatalog::new(source.clone()).with_live(source, "live.json");

    let files = catalog.list().await.unwrap();
    assert_eq!(files.len(), 2);
    let live = files.last().unwrap();
    assert!(live.is_live);
    assert!(live.timestamp > files[0].timestamp);

    let statuses = catalog.fetch_statuses(live).await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].num_bikes_available, 2);
}

#[tokio::test]
async fn test_missing_index_is_catalog_unavailable() {
    let folder = SnapshotFolder::new();
    let err = catalog_for(&folder).list().await.unwrap_err();
    assert!(matches!(err, StationError::CatalogUnavailable(_)));
    assert_eq!(err.http_status_code(), 503);
}

#[tokio::test]
async fn test_bad_index_line_fails_whole_listing() {
    let mut folder = SnapshotFolder::new();
    folder.set_index(&["2024-01-01_08:00.json", "yesterday.json"]);

    let err = catalog_for(&folder).list().await.unwrap_err();
    assert!(matches!(err, StationError::CatalogUnavailable(_)));
}

// ============================================================================
// Snapshot fetch
// ============================================================================

#[tokio::test]
async fn test_fetch_statuses_tolerates_missing_ebike_slot() {
    let mut folder = SnapshotFolder::new();
    folder.add_snapshot("2024-01-01_08:00", vec![status_without_ebike(42, 4, 10)]);

    let catalog = catalog_for(&folder);
    let files = catalog.list().await.unwrap();
    let statuses = catalog.fetch_statuses(&files[0]).await.unwrap();
    assert_eq!(
        statuses[0]
            .num_bikes_available_types
            .count(station_common::BikeKind::Ebike),
        0
    );
}

#[tokio::test]
async fn test_fetch_missing_snapshot_is_unavailable() {
    let mut folder = SnapshotFolder::new();
    folder.set_index(&["2024-01-01_08:00.json"]);

    let catalog = catalog_for(&folder);
    let files = catalog.list().await.unwrap();
    let err = catalog.fetch_statuses(&files[0]).await.unwrap_err();
    assert!(matches!(err, StationError::SnapshotUnavailable(_)));
}

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_registry_load() {
    let folder = SnapshotFolder::new();
    folder.write_raw("stations.json", &paris_registry());

    let source = FsSource::new(folder.path());
    let registry = StationRegistry::load(&source, "stations.json").await.unwrap();
    assert_eq!(registry.len(), 3);

    let bastille = registry.get(42).unwrap();
    assert_eq!(bastille.name, "Bastille");
    assert_eq!(bastille.lon, 2.35);
    assert_eq!(bastille.lat, 48.85);
}

#[tokio::test]
async fn test_registry_missing_is_unavailable() {
    let folder = SnapshotFolder::new();
    let source = FsSource::new(folder.path());
    let err = StationRegistry::load(&source, "stations.json").await.unwrap_err();
    assert!(matches!(err, StationError::RegistryUnavailable(_)));
}
