//! Application state for the map service.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

use ingestion::FeatureCell;
use renderer::{IconStyle, IconSynthesizer};
use storage::source::is_http_url;
use storage::{source_for, HttpSource, IconCache, SnapshotCatalog, SnapshotFile, SnapshotSource, StationRegistry};

use crate::config::{Args, ServiceConfig};
use crate::metrics::MetricsCollector;

/// Shared application state.
pub struct AppState {
    pub catalog: SnapshotCatalog,

    /// Current station features, shared with the icon synthesizer.
    pub features: Arc<FeatureCell>,

    pub icons: IconSynthesizer,
    pub icon_cache: IconCache,
    pub metrics: Arc<MetricsCollector>,

    registry_source: Arc<dyn SnapshotSource>,
    registry_location: String,

    /// Set once the registry has been fetched.
    registry: RwLock<Option<Arc<StationRegistry>>>,

    /// Last successful catalog listing.
    listing: RwLock<Option<Arc<Vec<SnapshotFile>>>>,
}

impl AppState {
    /// Build the state from arguments. Nothing is fetched yet.
    pub fn new(args: &Args, config: ServiceConfig) -> Result<Self> {
        let timeout = args.fetch_timeout();
        let snapshots = source_for(&args.snapshot_root, timeout)?;

        let mut catalog = SnapshotCatalog::new(snapshots.clone()).with_index_location(&args.snapshot_index);
        if let Some(live) = &args.live_status {
            let live_source = if is_http_url(live) {
                Arc::new(HttpSource::new(live.as_str(), timeout)?) as Arc<dyn SnapshotSource>
            } else {
                snapshots.clone()
            };
            catalog = catalog.with_live(live_source, live.as_str());
        }

        let registry_source = if is_http_url(&args.registry) {
            Arc::new(HttpSource::new(args.registry.as_str(), timeout)?) as Arc<dyn SnapshotSource>
        } else {
            snapshots
        };

        Ok(Self::from_parts(
            catalog,
            registry_source,
            args.registry.clone(),
            config.style,
            config.icon_cache_kb,
        ))
    }

    pub fn from_parts(
        catalog: SnapshotCatalog,
        registry_source: Arc<dyn SnapshotSource>,
        registry_location: impl Into<String>,
        style: IconStyle,
        icon_cache_kb: usize,
    ) -> Self {
        let features = Arc::new(FeatureCell::new());
        let icons = IconSynthesizer::new(style, features.clone());

        Self {
            catalog,
            features,
            icons,
            icon_cache: IconCache::new(icon_cache_kb),
            metrics: Arc::new(MetricsCollector::new()),
            registry_source,
            registry_location: registry_location.into(),
            registry: RwLock::new(None),
            listing: RwLock::new(None),
        }
    }

    pub fn registry_source(&self) -> &dyn SnapshotSource {
        self.registry_source.as_ref()
    }

    pub fn registry_location(&self) -> &str {
        &self.registry_location
    }

    pub async fn registry(&self) -> Option<Arc<StationRegistry>> {
        self.registry.read().await.clone()
    }

    pub async fn set_registry(&self, registry: Arc<StationRegistry>) {
        *self.registry.write().await = Some(registry);
    }

    pub async fn listing(&self) -> Option<Arc<Vec<SnapshotFile>>> {
        self.listing.read().await.clone()
    }

    pub async fn set_listing(&self, listing: Arc<Vec<SnapshotFile>>) {
        *self.listing.write().await = Some(listing);
    }

    /// Registry and catalog are both loaded.
    pub async fn is_ready(&self) -> bool {
        self.registry().await.is_some() && self.listing().await.is_some()
    }
}
