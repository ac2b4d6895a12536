//! Tests for the icon id wire format.

use station_common::{
    IconId, IconRequest, StationError, StationMetric, StationProperties,
};

fn station(mechanical: u32, ebike: u32, docks: u32) -> StationProperties {
    StationProperties {
        station_id: 123,
        station_name: "Gare de Lyon".to_string(),
        bikes_available: mechanical + ebike,
        bikes_available_mechanical: mechanical,
        bikes_available_ebike: ebike,
        docks_available: docks,
        is_functional: true,
        icon: None,
    }
}

// ============================================================================
// Canonical ids
// ============================================================================

#[test]
fn test_canonical_ids_parse_back_to_same_request() {
    let props = station(5, 2, 13);
    for metric in StationMetric::all() {
        let request = IconRequest::for_station(&props, *metric);
        let id = request.to_id();
        assert!(id.starts_with("stationv1::"));
        assert_eq!(id.parse::<IconRequest>().unwrap(), request);
    }
}

#[test]
fn test_every_metric_gets_distinct_id() {
    let props = station(1, 1, 1);
    let mut ids: Vec<String> = StationMetric::all()
        .iter()
        .map(|m| IconRequest::for_station(&props, *m).to_id())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_single_circle_label_is_metric_value() {
    let props = station(7, 3, 20);
    assert_eq!(
        IconRequest::for_station(&props, StationMetric::DocksAvailable).to_id(),
        "stationv1::docks_available::20"
    );
    assert_eq!(
        IconRequest::for_station(&props, StationMetric::BikesAvailableMechanical).to_id(),
        "stationv1::bikes_available_mechanical::7"
    );
}

#[test]
fn test_non_functional_station_is_unavailable_for_every_metric() {
    let mut props = station(7, 3, 20);
    props.is_functional = false;
    for metric in StationMetric::all() {
        assert_eq!(
            IconRequest::for_station(&props, *metric).to_id(),
            "stationv1::unavailable"
        );
    }
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_unknown_namespace_is_unknown_icon_request() {
    let err = IconId::parse("marker::bikes_available::1::2::3").unwrap_err();
    assert!(matches!(err, StationError::UnknownIconRequest(ref id) if id == "marker::bikes_available::1::2::3"));
    assert_eq!(err.http_status_code(), 404);
}

#[test]
fn test_negative_counts_rejected() {
    assert!(IconId::parse("stationv1::bikes_available::-1::2::3").is_err());
}

#[test]
fn test_doughnut_label_saturates_at_u32_max() {
    let id = format!("stationv1::bikes_available::{}::1::0", u32::MAX);
    let request = match IconId::parse(&id).unwrap() {
        IconId::SelfDescribing(request) => request,
        other => panic!("unexpected id: {other:?}"),
    };
    assert_eq!(request.label(), Some(u32::MAX));
    assert_eq!(request.to_id(), id);

    let both = IconRequest::BikesAvailable {
        mechanical: u32::MAX,
        ebike: u32::MAX,
        docks: u32::MAX,
    };
    assert_eq!(both.label(), Some(u32::MAX));
}
