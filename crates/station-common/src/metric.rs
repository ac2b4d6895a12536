//! Numerical station properties a map layer can be driven by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geojson::StationProperties;

/// Property selected for heatmap weighting and icon labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationMetric {
    #[default]
    BikesAvailable,
    BikesAvailableMechanical,
    BikesAvailableEbike,
    DocksAvailable,
}

impl StationMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationMetric::BikesAvailable => "bikes_available",
            StationMetric::BikesAvailableMechanical => "bikes_available_mechanical",
            StationMetric::BikesAvailableEbike => "bikes_available_ebike",
            StationMetric::DocksAvailable => "docks_available",
        }
    }

    pub fn all() -> &'static [StationMetric] {
        &[
            StationMetric::BikesAvailable,
            StationMetric::BikesAvailableMechanical,
            StationMetric::BikesAvailableEbike,
            StationMetric::DocksAvailable,
        ]
    }

    /// Read this metric from a feature's properties.
    pub fn value(&self, props: &StationProperties) -> u32 {
        match self {
            StationMetric::BikesAvailable => props.bikes_available,
            StationMetric::BikesAvailableMechanical => props.bikes_available_mechanical,
            StationMetric::BikesAvailableEbike => props.bikes_available_ebike,
            StationMetric::DocksAvailable => props.docks_available,
        }
    }
}

impl fmt::Display for StationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown station metric: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for StationMetric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StationMetric::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parse_roundtrip() {
        for metric in StationMetric::all() {
            assert_eq!(metric.as_str().parse::<StationMetric>().unwrap(), *metric);
        }
        assert!("bikes".parse::<StationMetric>().is_err());
    }

    #[test]
    fn test_metric_serde_names() {
        let json = serde_json::to_string(&StationMetric::DocksAvailable).unwrap();
        assert_eq!(json, "\"docks_available\"");
    }
}
