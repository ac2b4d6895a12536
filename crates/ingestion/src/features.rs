//! Build GeoJSON station features from enriched records.

use serde::Serialize;
use std::collections::HashMap;

use station_common::{
    IconRequest, StationFeature, StationFeatureCollection, StationMetric, StationProperties,
};

use crate::enrich::EnrichedStation;

/// Station features of one snapshot, indexed by station id.
///
/// Features keep the order in which their ids were first seen.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    snapshot: Option<String>,
    features: Vec<StationFeature>,
    index: HashMap<String, usize>,
}

impl FeatureSet {
    /// Empty set, published before any snapshot is loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build features from enriched records. A repeated station id replaces
    /// the earlier feature in place.
    pub fn build(enriched: &[EnrichedStation]) -> Self {
        let mut set = Self {
            snapshot: None,
            features: Vec::with_capacity(enriched.len()),
            index: HashMap::with_capacity(enriched.len()),
        };

        for record in enriched {
            let feature =
                StationFeature::point(record.station.lon, record.station.lat, record.properties());
            let key = feature.key();
            match set.index.get(&key) {
                Some(&slot) => set.features[slot] = feature,
                None => {
                    set.index.insert(key, set.features.len());
                    set.features.push(feature);
                }
            }
        }
        set
    }

    /// Tag the set with the snapshot it was built from.
    pub fn with_snapshot(mut self, key: impl Into<String>) -> Self {
        self.snapshot = Some(key.into());
        self
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Feature for `station_id` (decimal string form).
    pub fn get(&self, station_id: &str) -> Option<&StationFeature> {
        self.index.get(station_id).map(|&slot| &self.features[slot])
    }

    pub fn features(&self) -> &[StationFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// All features as a FeatureCollection.
    pub fn collection(&self) -> StationFeatureCollection {
        StationFeatureCollection::new(self.features.clone())
    }

    /// Largest value of `metric` over the set, 0 when empty.
    pub fn max_metric(&self, metric: StationMetric) -> u32 {
        self.features
            .iter()
            .map(|f| metric.value(&f.properties))
            .max()
            .unwrap_or(0)
    }

    /// Layer for the map engine: every feature carries its icon id for
    /// `metric`.
    pub fn layer(&self, metric: StationMetric) -> StationLayer {
        let features = self
            .features
            .iter()
            .cloned()
            .map(|mut feature| {
                feature.properties.icon =
                    Some(IconRequest::for_station(&feature.properties, metric).to_id());
                feature
            })
            .collect();

        StationLayer {
            snapshot: self.snapshot.clone(),
            metric,
            max: self.max_metric(metric),
            stations: StationFeatureCollection::new(features),
        }
    }

    /// Properties of one station, cloned out of the set.
    pub fn properties(&self, station_id: &str) -> Option<StationProperties> {
        self.get(station_id).map(|f| f.properties.clone())
    }
}

/// Station layer served to the map engine.
#[derive(Debug, Clone, Serialize)]
pub struct StationLayer {
    pub snapshot: Option<String>,
    pub metric: StationMetric,
    /// Maximum of `metric`, used to normalise heatmap weights.
    pub max: u32,
    pub stations: StationFeatureCollection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use station_common::{BikesByType, RawStationStatus, Station};
    use std::collections::BTreeMap;

    fn enriched(id: u64, mechanical: u32, ebike: u32, docks: u32) -> EnrichedStation {
        EnrichedStation {
            station: Station {
                station_id: id,
                name: format!("S{}", id),
                lat: 48.85,
                lon: 2.35,
                capacity: 30,
                station_code: String::new(),
                rental_methods: None,
            },
            status: RawStationStatus {
                station_id: id,
                num_bikes_available: mechanical + ebike,
                num_bikes_available_types: BikesByType::Flat(BTreeMap::new()),
                num_docks_available: docks,
                is_installed: 1,
                is_returning: 1,
                is_renting: 1,
                last_reported: 0,
            },
            bikes_available_mechanical: mechanical,
            bikes_available_ebike: ebike,
            is_functional: true,
        }
    }

    #[test]
    fn test_build_keeps_enrichment_order() {
        let set = FeatureSet::build(&[enriched(5, 1, 0, 1), enriched(2, 1, 0, 1), enriched(9, 1, 0, 1)]);
        let ids: Vec<u64> = set.features().iter().map(|f| f.properties.station_id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
        assert_eq!(set.collection().features.len(), 3);
    }

    #[test]
    fn test_coordinates_are_lon_lat_zero() {
        let set = FeatureSet::build(&[enriched(42, 1, 1, 1)]);
        let feature = set.get("42").unwrap();
        assert_eq!(feature.geometry.coordinates, [2.35, 48.85, 0.0]);
        assert!(set.get("43").is_none());
    }

    #[test]
    fn test_duplicate_id_last_write_wins() {
        let set = FeatureSet::build(&[enriched(1, 1, 0, 0), enriched(2, 0, 0, 0), enriched(1, 8, 0, 0)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.features()[0].properties.bikes_available_mechanical, 8);
        assert_eq!(set.get("1").unwrap().properties.bikes_available_mechanical, 8);
    }

    #[test]
    fn test_layer_carries_icons_and_max() {
        let set = FeatureSet::build(&[enriched(1, 3, 1, 6), enriched(2, 0, 2, 9)]).with_snapshot("2024-01-01_08:00");
        let layer = set.layer(StationMetric::DocksAvailable);

        assert_eq!(layer.max, 9);
        assert_eq!(layer.snapshot.as_deref(), Some("2024-01-01_08:00"));
        assert_eq!(
            layer.stations.features[0].properties.icon.as_deref(),
            Some("stationv1::docks_available::6")
        );
        // the set itself is untouched
        assert!(set.get("1").unwrap().properties.icon.is_none());
    }

    #[test]
    fn test_empty_set() {
        let set = FeatureSet::empty();
        assert!(set.is_empty());
        assert_eq!(set.max_metric(StationMetric::BikesAvailable), 0);
    }
}
