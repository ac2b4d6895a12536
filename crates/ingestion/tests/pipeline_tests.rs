//! Registry join and feature building over real snapshot documents.

use station_common::{RawStationStatus, StationEnvelope, StationLookup, StationMetric};
use storage::StationRegistry;
use test_utils::{assert_position_approx_eq, envelope, paris_registry, status_json, status_with_flags, status_without_ebike};

use ingestion::{enrich, FeatureCell, FeatureSet, PublishOutcome};

fn registry() -> StationRegistry {
    StationRegistry::parse(&paris_registry()).unwrap()
}

fn statuses(records: Vec<serde_json::Value>) -> Vec<RawStationStatus> {
    StationEnvelope::parse(&envelope(records)).unwrap()
}

#[test]
fn test_station_absent_from_snapshot_has_no_feature() {
    let raw = statuses(vec![status_json(123, 3, 1, 20), status_json(7, 0, 0, 25)]);
    let set = FeatureSet::build(&enrich(raw, &registry()));

    assert_eq!(set.len(), 2);
    assert!(set.get("42").is_none());
    assert!(set
        .collection()
        .features
        .iter()
        .all(|f| f.properties.station_id != 42));
}

#[test]
fn test_unregistered_records_are_dropped_not_errors() {
    let raw = statuses(vec![status_json(42, 1, 1, 1), status_json(99999, 5, 5, 5)]);
    let enriched = enrich(raw, &registry());
    assert_eq!(enriched.len(), 1);
    assert_eq!(enriched[0].station.station_id, 42);
}

#[test]
fn test_feature_for_registered_station() {
    let raw = statuses(vec![status_json(42, 4, 2, 24)]);
    let set = FeatureSet::build(&enrich(raw, &registry()));

    let feature = set.get("42").unwrap();
    assert_position_approx_eq!(feature.geometry.coordinates, (2.35, 48.85), 1e-12);
    assert_eq!(feature.properties.station_name, "Bastille");
    assert_eq!(feature.properties.bikes_available, 6);
    assert_eq!(feature.properties.bikes_available_ebike, 2);
}

#[test]
fn test_functional_flags_flow_into_icons() {
    let raw = statuses(vec![status_with_flags(42, 1, 0, 1), status_without_ebike(7, 3, 9)]);
    let set = FeatureSet::build(&enrich(raw, &registry()));
    let layer = set.layer(StationMetric::BikesAvailable);

    let icons: Vec<&str> = layer
        .stations
        .features
        .iter()
        .map(|f| f.properties.icon.as_deref().unwrap())
        .collect();
    assert_eq!(
        icons,
        vec!["stationv1::unavailable", "stationv1::bikes_available::3::0::9"]
    );
}

#[test]
fn test_cell_serves_lookup_from_current_set() {
    let cell = FeatureCell::new();
    assert!(cell.station("42").is_none());

    let ticket = cell.begin("2024-01-01_08:00");
    let raw = statuses(vec![status_json(42, 4, 2, 24)]);
    let set = FeatureSet::build(&enrich(raw, &registry())).with_snapshot(ticket.key());
    assert_eq!(cell.publish(&ticket, set), PublishOutcome::Applied);

    assert_eq!(cell.station("42").unwrap().docks_available, 24);
}
