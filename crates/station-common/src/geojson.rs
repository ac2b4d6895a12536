//! GeoJSON types for station layers.
//!
//! The rendering engine consumes a plain `FeatureCollection` of points, one
//! per station, whose properties drive both the heatmap and the symbol icons.

use serde::{Deserialize, Serialize};

/// A GeoJSON FeatureCollection of stations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<StationFeature>,
}

impl StationFeatureCollection {
    pub fn new(features: Vec<StationFeature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }
}

impl Default for StationFeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// One station as a GeoJSON point feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub properties: StationProperties,

    pub geometry: PointGeometry,
}

impl StationFeature {
    /// Create a feature at `(lon, lat)`. Elevation is always zero.
    pub fn point(lon: f64, lat: f64, properties: StationProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            properties,
            geometry: PointGeometry::new(lon, lat),
        }
    }

    /// Key of this feature in a feature index.
    pub fn key(&self) -> String {
        self.properties.station_id.to_string()
    }
}

/// GeoJSON point with a `[lon, lat, elevation]` coordinate triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub type_: String,

    pub coordinates: [f64; 3],
}

impl PointGeometry {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            type_: "Point".to_string(),
            coordinates: [lon, lat, 0.0],
        }
    }

    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Properties attached to every station feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StationProperties {
    pub station_id: u64,
    pub station_name: String,

    pub bikes_available: u32,
    pub bikes_available_mechanical: u32,
    pub bikes_available_ebike: u32,
    pub docks_available: u32,

    pub is_functional: bool,

    /// Icon id for the layer's selected metric, filled in when a layer is
    /// served to the rendering engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}
