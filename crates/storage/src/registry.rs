//! Static station metadata, loaded once per session.

use std::collections::HashMap;
use tracing::{info, warn};

use station_common::{Station, StationEnvelope, StationError, StationResult};

use crate::source::SnapshotSource;

/// Station metadata keyed by station id.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: HashMap<u64, Station>,
}

impl StationRegistry {
    /// Build a registry from a list of stations. When an id repeats, the
    /// first occurrence is kept.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut map = HashMap::with_capacity(stations.len());
        for station in stations {
            if map.contains_key(&station.station_id) {
                warn!(station_id = station.station_id, "Duplicate station in registry, keeping first");
                continue;
            }
            map.insert(station.station_id, station);
        }
        Self { stations: map }
    }

    /// Parse a `{ data: { stations: [...] } }` registry document.
    pub fn parse(text: &str) -> StationResult<Self> {
        let stations: Vec<Station> = StationEnvelope::parse(text)
            .map_err(|e| StationError::RegistryUnavailable(format!("Invalid registry document: {}", e)))?;
        Ok(Self::from_stations(stations))
    }

    /// Fetch and parse the registry at `location`.
    pub async fn load(source: &dyn SnapshotSource, location: &str) -> StationResult<Self> {
        let text = source
            .fetch_text(location)
            .await
            .map_err(|e| StationError::RegistryUnavailable(e.to_string()))?;
        let registry = Self::parse(&text)?;

        info!(
            source = %source.describe(),
            location = %location,
            stations = registry.len(),
            "Loaded station registry"
        );
        Ok(registry)
    }

    /// Exact-match lookup by station id.
    pub fn get(&self, station_id: u64) -> Option<&Station> {
        self.stations.get(&station_id)
    }

    pub fn contains(&self, station_id: u64) -> bool {
        self.stations.contains_key(&station_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
