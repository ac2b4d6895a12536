//! Icon synthesis: icon id in, bitmap out.
//!
//! The synthesizer keeps no per-request state. Station-keyed ids read the
//! feature index through the shared [`StationLookup`] at call time, so they
//! always see the latest published features.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use station_common::{IconId, IconRequest, StationError, StationLookup, StationResult};

use crate::icons::{render_icon, IconBitmap};
use crate::style::IconStyle;

/// A resolved icon, keyed by its canonical (self-describing) id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub canonical_id: String,
    pub request: IconRequest,
    pub bitmap: IconBitmap,
}

/// Same as [`ResolvedIcon`], encoded as PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedIcon {
    pub canonical_id: String,
    pub png: Vec<u8>,
}

pub struct IconSynthesizer {
    style: IconStyle,
    lookup: Arc<dyn StationLookup>,
}

impl IconSynthesizer {
    pub fn new(style: IconStyle, lookup: Arc<dyn StationLookup>) -> Self {
        Self { style, lookup }
    }

    pub fn style(&self) -> &IconStyle {
        &self.style
    }

    /// Decode `id` into a self-describing request.
    ///
    /// Unknown namespaces, kinds and malformed arguments fail with
    /// [`StationError::UnknownIconRequest`]; a station-keyed id naming a
    /// station absent from the current features fails with
    /// [`StationError::StationNotFound`].
    pub fn decode(&self, id: &str) -> StationResult<IconRequest> {
        let parsed = IconId::parse(id).map_err(|e| {
            warn!(icon_id = %id, "Unknown icon request");
            e
        })?;

        match parsed.resolve(self.lookup.as_ref()) {
            Some(request) => Ok(request),
            None => {
                warn!(icon_id = %id, "Icon request for a station missing from the current features");
                Err(StationError::StationNotFound(id.to_string()))
            }
        }
    }

    /// Draw a request.
    pub fn render(&self, request: &IconRequest) -> StationResult<IconBitmap> {
        let start = Instant::now();
        let bitmap = render_icon(request, &self.style).ok_or_else(|| {
            StationError::RenderError(format!("cannot allocate a {0}x{0} canvas", self.style.size))
        })?;
        debug!(
            icon_id = %request,
            duration_us = start.elapsed().as_micros() as u64,
            "Rendered icon"
        );
        Ok(bitmap)
    }

    /// Decode and draw `id`.
    pub fn resolve(&self, id: &str) -> StationResult<ResolvedIcon> {
        let request = self.decode(id)?;
        let bitmap = self.render(&request)?;
        Ok(ResolvedIcon {
            canonical_id: request.to_id(),
            request,
            bitmap,
        })
    }

    /// Draw an already decoded request and encode it as PNG.
    pub fn encode(&self, request: &IconRequest) -> StationResult<EncodedIcon> {
        let bitmap = self.render(request)?;
        let png = bitmap
            .to_png()
            .map_err(|e| StationError::RenderError(e.to_string()))?;
        Ok(EncodedIcon {
            canonical_id: request.to_id(),
            png,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use station_common::StationProperties;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct SwapLookup(RwLock<HashMap<String, StationProperties>>);

    impl StationLookup for SwapLookup {
        fn station(&self, station_id: &str) -> Option<StationProperties> {
            self.0.read().unwrap().get(station_id).cloned()
        }
    }

    fn props(mechanical: u32) -> StationProperties {
        StationProperties {
            station_id: 42,
            station_name: "Bastille".into(),
            bikes_available: mechanical,
            bikes_available_mechanical: mechanical,
            bikes_available_ebike: 0,
            docks_available: 10,
            is_functional: true,
            icon: None,
        }
    }

    #[test]
    fn test_unknown_ids_produce_no_image() {
        let synth = IconSynthesizer::new(IconStyle::default(), Arc::new(SwapLookup::default()));
        assert!(matches!(
            synth.resolve("marker::x"),
            Err(StationError::UnknownIconRequest(_))
        ));
        assert!(matches!(
            synth.resolve("stationv1::42::bikes_available"),
            Err(StationError::StationNotFound(_))
        ));
    }

    #[test]
    fn test_station_keyed_sees_latest_features() {
        let lookup = Arc::new(SwapLookup::default());
        let synth = IconSynthesizer::new(IconStyle::default(), lookup.clone());

        lookup.0.write().unwrap().insert("42".into(), props(5));
        let first = synth.resolve("stationv1::42::bikes_available").unwrap();
        assert_eq!(first.canonical_id, "stationv1::bikes_available::5::0::10");

        lookup.0.write().unwrap().insert("42".into(), props(6));
        let second = synth.resolve("stationv1::42::bikes_available").unwrap();
        assert_eq!(second.canonical_id, "stationv1::bikes_available::6::0::10");
    }

    #[test]
    fn test_canonical_id_is_preserved() {
        let synth = IconSynthesizer::new(IconStyle::default(), Arc::new(SwapLookup::default()));
        let icon = synth.resolve("stationv1::docks_available::3").unwrap();
        assert_eq!(icon.canonical_id, "stationv1::docks_available::3");
        assert_eq!(icon.request, IconRequest::DocksAvailable { label: Some(3) });
    }
}
