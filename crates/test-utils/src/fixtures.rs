//! Common test fixtures for station occupancy tests.
//!
//! Records are built as raw JSON so tests exercise the same parsing path as
//! real registry and snapshot documents.

use serde_json::{json, Value};

/// Map center used by the web client (lon, lat).
pub const PARIS_CENTER: (f64, f64) = (2.3488, 48.8534);

/// A registry station at `(lon, lat)`.
pub fn station_json(station_id: u64, name: &str, lon: f64, lat: f64, capacity: u32) -> Value {
    json!({
        "station_id": station_id,
        "name": name,
        "lat": lat,
        "lon": lon,
        "capacity": capacity,
        "stationCode": format!("{:05}", station_id),
        "rental_methods": ["CREDITCARD"],
    })
}

/// A functional station status with the per-type slot list.
pub fn status_json(station_id: u64, mechanical: u32, ebike: u32, docks: u32) -> Value {
    json!({
        "station_id": station_id,
        "num_bikes_available": mechanical + ebike,
        "num_bikes_available_types": [
            {"mechanical": mechanical},
            {"ebike": ebike},
        ],
        "num_docks_available": docks,
        "is_installed": 1,
        "is_returning": 1,
        "is_renting": 1,
        "last_reported": 1704096000,
    })
}

/// Status with explicit installed/renting/returning flags.
pub fn status_with_flags(
    station_id: u64,
    installed: u8,
    renting: u8,
    returning: u8,
) -> Value {
    let mut status = status_json(station_id, 1, 1, 1);
    status["is_installed"] = json!(installed);
    status["is_renting"] = json!(renting);
    status["is_returning"] = json!(returning);
    status
}

/// Status whose per-type list has no ebike slot at all.
pub fn status_without_ebike(station_id: u64, mechanical: u32, docks: u32) -> Value {
    json!({
        "station_id": station_id,
        "num_bikes_available": mechanical,
        "num_bikes_available_types": [{"mechanical": mechanical}],
        "num_docks_available": docks,
        "is_installed": 1,
        "is_returning": 1,
        "is_renting": 1,
        "last_reported": 1704096000,
    })
}

/// Wrap records in the `{ data: { stations: [...] } }` envelope.
pub fn envelope(stations: Vec<Value>) -> String {
    json!({ "data": { "stations": stations } }).to_string()
}

/// Small registry around Paris: Bastille (42), Gare de Lyon (123), Nation (7).
pub fn paris_registry() -> String {
    envelope(vec![
        station_json(42, "Bastille", 2.35, 48.85, 30),
        station_json(123, "Gare de Lyon", 2.373, 48.844, 40),
        station_json(7, "Nation", 2.395, 48.848, 25),
    ])
}
