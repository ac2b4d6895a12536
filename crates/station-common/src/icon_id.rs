//! Icon identifier wire format.
//!
//! The map engine requests symbol bitmaps by opaque string id. Ids are
//! `::`-delimited and start with the `stationv1` namespace tag:
//!
//! ```text
//! stationv1::unavailable
//! stationv1::bikes_available::<mechanical>::<ebike>::<docks>
//! stationv1::bikes_available_mechanical[::<label>]
//! stationv1::bikes_available_ebike[::<label>]
//! stationv1::docks_available[::<label>]
//! ```
//!
//! Those self-describing ids embed every value that affects the pixels, so
//! equal ids always render identical bitmaps. The older station-keyed form
//! `stationv1::<station_id>::<metric>` is still accepted and resolved against
//! the current feature index through [`StationLookup`].
//!
//! All string splitting for icon ids happens in this module.

use std::fmt;
use std::str::FromStr;

use crate::error::StationError;
use crate::geojson::StationProperties;
use crate::metric::StationMetric;

/// Namespace tag leading every icon id.
pub const ICON_NAMESPACE: &str = "stationv1";

/// Token separator inside icon ids.
pub const ICON_SEPARATOR: &str = "::";

const KIND_UNAVAILABLE: &str = "unavailable";

/// A self-describing icon request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconRequest {
    /// Station not functional.
    Unavailable,
    /// Three-slice doughnut of mechanical bikes, e-bikes and free docks.
    BikesAvailable { mechanical: u32, ebike: u32, docks: u32 },
    BikesAvailableMechanical { label: Option<u32> },
    BikesAvailableEbike { label: Option<u32> },
    DocksAvailable { label: Option<u32> },
}

impl IconRequest {
    /// Build the request describing how `props` should look for `metric`.
    pub fn for_station(props: &StationProperties, metric: StationMetric) -> Self {
        if !props.is_functional {
            return IconRequest::Unavailable;
        }

        let label = Some(metric.value(props));
        match metric {
            StationMetric::BikesAvailable => IconRequest::BikesAvailable {
                mechanical: props.bikes_available_mechanical,
                ebike: props.bikes_available_ebike,
                docks: props.docks_available,
            },
            StationMetric::BikesAvailableMechanical => {
                IconRequest::BikesAvailableMechanical { label }
            }
            StationMetric::BikesAvailableEbike => IconRequest::BikesAvailableEbike { label },
            StationMetric::DocksAvailable => IconRequest::DocksAvailable { label },
        }
    }

    /// Kind token used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            IconRequest::Unavailable => KIND_UNAVAILABLE,
            IconRequest::BikesAvailable { .. } => StationMetric::BikesAvailable.as_str(),
            IconRequest::BikesAvailableMechanical { .. } => {
                StationMetric::BikesAvailableMechanical.as_str()
            }
            IconRequest::BikesAvailableEbike { .. } => StationMetric::BikesAvailableEbike.as_str(),
            IconRequest::DocksAvailable { .. } => StationMetric::DocksAvailable.as_str(),
        }
    }

    /// Number drawn at the center of the icon, if any. The doughnut label
    /// saturates at `u32::MAX`.
    pub fn label(&self) -> Option<u32> {
        match self {
            IconRequest::Unavailable => None,
            IconRequest::BikesAvailable {
                mechanical, ebike, ..
            } => Some(mechanical.saturating_add(*ebike)),
            IconRequest::BikesAvailableMechanical { label }
            | IconRequest::BikesAvailableEbike { label }
            | IconRequest::DocksAvailable { label } => *label,
        }
    }

    /// Serialize to the canonical id string.
    pub fn to_id(&self) -> String {
        let mut tokens = vec![ICON_NAMESPACE.to_string(), self.kind().to_string()];
        match self {
            IconRequest::Unavailable => {}
            IconRequest::BikesAvailable {
                mechanical,
                ebike,
                docks,
            } => {
                tokens.push(mechanical.to_string());
                tokens.push(ebike.to_string());
                tokens.push(docks.to_string());
            }
            IconRequest::BikesAvailableMechanical { label }
            | IconRequest::BikesAvailableEbike { label }
            | IconRequest::DocksAvailable { label } => {
                if let Some(label) = label {
                    tokens.push(label.to_string());
                }
            }
        }
        tokens.join(ICON_SEPARATOR)
    }

    /// Interpret `kind` and its arguments. `None` when the kind is unknown or
    /// the argument list does not fit it.
    fn from_tokens(kind: &str, args: &[&str]) -> Option<Self> {
        let numbers = args
            .iter()
            .map(|arg| arg.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;

        if kind == KIND_UNAVAILABLE {
            return numbers.is_empty().then_some(IconRequest::Unavailable);
        }

        let label = numbers.first().copied();

        match (kind.parse::<StationMetric>().ok()?, numbers.as_slice()) {
            (StationMetric::BikesAvailable, [mechanical, ebike, docks]) => {
                Some(IconRequest::BikesAvailable {
                    mechanical: *mechanical,
                    ebike: *ebike,
                    docks: *docks,
                })
            }
            (StationMetric::BikesAvailable, _) => None,
            (_, args) if args.len() > 1 => None,
            (StationMetric::BikesAvailableMechanical, _) => {
                Some(IconRequest::BikesAvailableMechanical { label })
            }
            (StationMetric::BikesAvailableEbike, _) => {
                Some(IconRequest::BikesAvailableEbike { label })
            }
            (StationMetric::DocksAvailable, _) => Some(IconRequest::DocksAvailable { label }),
        }
    }
}

impl fmt::Display for IconRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_id())
    }
}

impl FromStr for IconRequest {
    type Err = StationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match IconId::parse(s)? {
            IconId::SelfDescribing(request) => Ok(request),
            IconId::StationKeyed { .. } => Err(StationError::UnknownIconRequest(s.to_string())),
        }
    }
}

/// Read access to the current station feature index.
pub trait StationLookup: Send + Sync {
    /// Properties of the station keyed by `station_id`, if present.
    fn station(&self, station_id: &str) -> Option<StationProperties>;
}

/// Any icon id accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconId {
    SelfDescribing(IconRequest),
    /// Legacy id naming a station and a metric; values come from the
    /// feature index at resolve time.
    StationKeyed {
        station_id: String,
        metric: StationMetric,
    },
}

impl IconId {
    /// Parse an icon id string.
    ///
    /// Fails with [`StationError::UnknownIconRequest`] when the namespace or
    /// kind is not recognised or the arguments are malformed.
    pub fn parse(id: &str) -> Result<Self, StationError> {
        let unknown = || StationError::UnknownIconRequest(id.to_string());

        let tokens: Vec<&str> = id.split(ICON_SEPARATOR).collect();
        let (namespace, rest) = tokens.split_first().ok_or_else(unknown)?;
        if *namespace != ICON_NAMESPACE {
            return Err(unknown());
        }
        let (kind, args) = rest.split_first().ok_or_else(unknown)?;

        if let Some(request) = IconRequest::from_tokens(kind, args) {
            return Ok(IconId::SelfDescribing(request));
        }

        match args {
            [metric] if !kind.is_empty() && kind.bytes().all(|b| b.is_ascii_digit()) => {
                let metric = metric.parse::<StationMetric>().map_err(|_| unknown())?;
                Ok(IconId::StationKeyed {
                    station_id: kind.to_string(),
                    metric,
                })
            }
            _ => Err(unknown()),
        }
    }

    /// The self-describing request for this id.
    ///
    /// Station-keyed ids are looked up in `lookup` at call time; `None` when
    /// that station is not in the current index.
    pub fn resolve(&self, lookup: &dyn StationLookup) -> Option<IconRequest> {
        match self {
            IconId::SelfDescribing(request) => Some(*request),
            IconId::StationKeyed { station_id, metric } => lookup
                .station(station_id)
                .map(|props| IconRequest::for_station(&props, *metric)),
        }
    }

    /// Station-keyed id for a station and metric.
    pub fn station_keyed(station_id: u64, metric: StationMetric) -> String {
        [ICON_NAMESPACE, &station_id.to_string(), metric.as_str()].join(ICON_SEPARATOR)
    }
}
