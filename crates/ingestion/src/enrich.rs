//! Join snapshot status records with the station registry.

use tracing::debug;

use station_common::{BikeKind, RawStationStatus, Station, StationProperties};
use storage::StationRegistry;

/// A status record joined with its registry station.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedStation {
    pub station: Station,
    pub status: RawStationStatus,
    pub bikes_available_mechanical: u32,
    pub bikes_available_ebike: u32,
    pub is_functional: bool,
}

impl EnrichedStation {
    /// Feature properties for this station.
    pub fn properties(&self) -> StationProperties {
        StationProperties {
            station_id: self.station.station_id,
            station_name: self.station.name.clone(),
            bikes_available: self.status.num_bikes_available,
            bikes_available_mechanical: self.bikes_available_mechanical,
            bikes_available_ebike: self.bikes_available_ebike,
            docks_available: self.status.num_docks_available,
            is_functional: self.is_functional,
            icon: None,
        }
    }
}

/// Number of available bikes of `kind`; 0 when the record has no such slot.
pub fn find_bikes_type(record: &RawStationStatus, kind: BikeKind) -> u32 {
    record.num_bikes_available_types.count(kind)
}

/// Join `raw` against `registry`, in input order.
///
/// Records whose station id is not in the registry are dropped: a station
/// without coordinates cannot be placed on the map.
pub fn enrich(raw: Vec<RawStationStatus>, registry: &StationRegistry) -> Vec<EnrichedStation> {
    let total = raw.len();
    let enriched: Vec<EnrichedStation> = raw
        .into_iter()
        .filter_map(|status| {
            let station = registry.get(status.station_id)?.clone();
            Some(EnrichedStation {
                bikes_available_mechanical: find_bikes_type(&status, BikeKind::Mechanical),
                bikes_available_ebike: find_bikes_type(&status, BikeKind::Ebike),
                is_functional: status.is_functional(),
                station,
                status,
            })
        })
        .collect();

    debug!(
        records = total,
        enriched = enriched.len(),
        unmatched = total - enriched.len(),
        "Enriched snapshot records"
    );
    enriched
}
