//! Shared cell holding the current feature set.
//!
//! The feature builder is the only writer and always swaps in a whole new
//! [`FeatureSet`]; readers clone the `Arc` and never see a partial update.
//!
//! Snapshot loads are ticketed: [`FeatureCell::begin`] hands out a ticket per
//! selection and [`FeatureCell::publish`] only applies a result whose ticket
//! is still the newest one issued. A slow load for an older selection is
//! dropped instead of overwriting newer data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use station_common::{StationLookup, StationProperties};

use crate::features::FeatureSet;

/// Handle identifying one in-flight snapshot load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    id: u64,
    key: String,
}

impl LoadTicket {
    /// Snapshot key this load was started for.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Outcome of [`FeatureCell::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Applied,
    /// A newer load was started after this one; the result was discarded.
    Stale,
}

pub struct FeatureCell {
    current: RwLock<Arc<FeatureSet>>,
    latest_ticket: AtomicU64,
}

impl FeatureCell {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(FeatureSet::empty())),
            latest_ticket: AtomicU64::new(0),
        }
    }

    /// Start a load for snapshot `key`, superseding every earlier ticket.
    pub fn begin(&self, key: impl Into<String>) -> LoadTicket {
        let id = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = LoadTicket { id, key: key.into() };
        debug!(ticket = id, snapshot = %ticket.key, "Started snapshot load");
        ticket
    }

    /// Whether `ticket` is still the newest load.
    pub fn is_latest(&self, ticket: &LoadTicket) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket.id
    }

    /// Publish `set` if `ticket` is still the newest load.
    pub fn publish(&self, ticket: &LoadTicket, set: FeatureSet) -> PublishOutcome {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());

        // checked under the write lock so two publishes cannot interleave
        if !self.is_latest(ticket) {
            info!(
                snapshot = %ticket.key,
                ticket = ticket.id,
                latest = self.latest_ticket.load(Ordering::SeqCst),
                "Dropping stale snapshot load"
            );
            return PublishOutcome::Stale;
        }

        info!(snapshot = %ticket.key, stations = set.len(), "Published feature set");
        *current = Arc::new(set);
        PublishOutcome::Applied
    }

    /// Replace the current set unconditionally.
    pub fn replace(&self, set: FeatureSet) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Arc::new(set);
    }

    /// The current feature set.
    pub fn current(&self) -> Arc<FeatureSet> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for FeatureCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StationLookup for FeatureCell {
    fn station(&self, station_id: &str) -> Option<StationProperties> {
        self.current().properties(station_id)
    }
}
