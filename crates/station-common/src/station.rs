//! Station registry and per-snapshot status records.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Static station metadata from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: u64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub capacity: u32,
    #[serde(rename = "stationCode", default)]
    pub station_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_methods: Option<BTreeSet<String>>,
}

/// Bike types reported in the per-type availability slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BikeKind {
    Mechanical,
    Ebike,
}

impl BikeKind {
    /// Key used for this kind in snapshot files.
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeKind::Mechanical => "mechanical",
            BikeKind::Ebike => "ebike",
        }
    }
}

impl fmt::Display for BikeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type bike counts of one status record.
///
/// Feeds publish these either as a list of single-key objects
/// (`[{"mechanical": 3}, {"ebike": 1}]`) or as one flat object. A kind
/// missing from the record simply has no slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BikesByType {
    Slots(Vec<BTreeMap<String, u32>>),
    Flat(BTreeMap<String, u32>),
}

impl Default for BikesByType {
    fn default() -> Self {
        BikesByType::Slots(Vec::new())
    }
}

impl BikesByType {
    /// Count for `kind`, scanning slots in order. Missing kinds count as zero.
    pub fn count(&self, kind: BikeKind) -> u32 {
        let key = kind.as_str();
        match self {
            BikesByType::Slots(slots) => slots
                .iter()
                .find_map(|slot| slot.get(key).copied())
                .unwrap_or(0),
            BikesByType::Flat(map) => map.get(key).copied().unwrap_or(0),
        }
    }
}

/// Dynamic status of one station within one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStationStatus {
    pub station_id: u64,
    #[serde(default)]
    pub num_bikes_available: u32,
    #[serde(default, alias = "num_bikes_available_by_type")]
    pub num_bikes_available_types: BikesByType,
    #[serde(default)]
    pub num_docks_available: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_installed: u8,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_returning: u8,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_renting: u8,
    #[serde(default)]
    pub last_reported: i64,
}

impl RawStationStatus {
    /// Installed, renting and returning all at once.
    pub fn is_functional(&self) -> bool {
        self.is_installed != 0 && self.is_renting != 0 && self.is_returning != 0
    }
}

/// Accept 0/1 integers as well as JSON booleans for status flags.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(u8),
        Bool(bool),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Int(v) => v,
        Flag::Bool(b) => b as u8,
    })
}

/// `{ "data": { "stations": [...] } }` wrapper shared by the registry,
/// snapshot files and the live endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationEnvelope<T> {
    pub data: StationList<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationList<T> {
    pub stations: Vec<T>,
}

impl<T> StationEnvelope<T> {
    pub fn new(stations: Vec<T>) -> Self {
        Self {
            data: StationList { stations },
        }
    }

    pub fn into_stations(self) -> Vec<T> {
        self.data.stations
    }
}

impl<T: DeserializeOwned> StationEnvelope<T> {
    /// Parse an envelope document and return its station records.
    pub fn parse(text: &str) -> Result<Vec<T>, serde_json::Error> {
        let envelope: StationEnvelope<T> = serde_json::from_str(text)?;
        Ok(envelope.into_stations())
    }
}
