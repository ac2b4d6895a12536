//! Icon synthesis tests: determinism, id handling and PNG output.

use std::sync::Arc;

use renderer::{render_icon, IconStyle, IconSynthesizer};
use station_common::{IconRequest, StationLookup, StationProperties};

struct NoStations;

impl StationLookup for NoStations {
    fn station(&self, _station_id: &str) -> Option<StationProperties> {
        None
    }
}

fn synthesizer() -> IconSynthesizer {
    IconSynthesizer::new(IconStyle::default(), Arc::new(NoStations))
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_id_gives_identical_pixels() {
    let synth = synthesizer();
    for id in [
        "stationv1::unavailable",
        "stationv1::bikes_available::5::2::13",
        "stationv1::bikes_available::0::0::0",
        "stationv1::bikes_available_mechanical::7",
        "stationv1::bikes_available_ebike",
        "stationv1::docks_available::123",
    ] {
        let first = synth.resolve(id).unwrap();
        let second = synth.resolve(id).unwrap();
        assert_eq!(first.bitmap, second.bitmap, "{id}");
        assert_eq!(first.canonical_id, id);
    }
}

#[test]
fn test_same_id_gives_identical_png_bytes() {
    let synth = synthesizer();
    let request = IconRequest::BikesAvailable {
        mechanical: 8,
        ebike: 3,
        docks: 14,
    };
    let a = synth.encode(&request).unwrap();
    let b = synth.encode(&request).unwrap();
    assert_eq!(a.png, b.png);
    assert_eq!(&a.png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}

#[test]
fn test_changed_value_changes_id_and_pixels() {
    let synth = synthesizer();
    let five = synth.resolve("stationv1::bikes_available::5::2::13").unwrap();
    let six = synth.resolve("stationv1::bikes_available::6::2::13").unwrap();
    assert_ne!(five.canonical_id, six.canonical_id);
    assert_ne!(five.bitmap, six.bitmap);
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_each_kind_renders_something() {
    let style = IconStyle::default();
    for request in [
        IconRequest::Unavailable,
        IconRequest::BikesAvailable {
            mechanical: 1,
            ebike: 1,
            docks: 1,
        },
        IconRequest::BikesAvailableMechanical { label: None },
        IconRequest::BikesAvailableEbike { label: Some(4) },
        IconRequest::DocksAvailable { label: Some(0) },
    ] {
        let icon = render_icon(&request, &style).unwrap();
        assert!(!icon.is_blank(), "{request}");
    }
}

#[test]
fn test_label_changes_disc_pixels() {
    let style = IconStyle::default();
    let plain = render_icon(&IconRequest::DocksAvailable { label: None }, &style).unwrap();
    let labelled = render_icon(&IconRequest::DocksAvailable { label: Some(8) }, &style).unwrap();
    assert_ne!(plain, labelled);
}

#[test]
fn test_larger_style_scales_canvas() {
    let style = IconStyle {
        size: 64,
        ..IconStyle::default()
    };
    let synth = IconSynthesizer::new(style, Arc::new(NoStations));
    let icon = synth.resolve("stationv1::unavailable").unwrap();
    assert_eq!((icon.bitmap.width, icon.bitmap.height), (64, 64));
}

#[test]
fn test_max_counts_render_without_overflow() {
    let synth = synthesizer();
    let id = format!("stationv1::bikes_available::{}::1::0", u32::MAX);
    let icon = synth.resolve(&id).unwrap();
    assert_eq!(icon.canonical_id, id);
    assert!(!icon.bitmap.is_blank());

    let request = IconRequest::BikesAvailable {
        mechanical: u32::MAX,
        ebike: u32::MAX,
        docks: u32::MAX,
    };
    let encoded = synth.encode(&request).unwrap();
    assert_eq!(&encoded.png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}
