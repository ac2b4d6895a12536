//! Service metrics.
//!
//! Every event is counted twice: in-process atomics back the JSON summary at
//! `/api/metrics`, and the `metrics` facade feeds the Prometheus exporter.

use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use ingestion::PublishOutcome;
use storage::IconCacheSnapshot;

/// How an icon request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconOutcome {
    Hit,
    Miss,
    Unknown,
    Error,
}

impl IconOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconOutcome::Hit => "hit",
            IconOutcome::Miss => "miss",
            IconOutcome::Unknown => "unknown",
            IconOutcome::Error => "error",
        }
    }
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        }
    }
}

#[derive(Debug)]
pub struct MetricsCollector {
    icon_hits: AtomicU64,
    icon_misses: AtomicU64,
    icon_unknown: AtomicU64,
    icon_errors: AtomicU64,
    snapshot_loads: AtomicU64,
    snapshot_failures: AtomicU64,
    stale_loads: AtomicU64,
    render_times: Mutex<TimingStats>,
    load_times: Mutex<TimingStats>,
    start_time: Instant,
}

/// JSON summary of [`MetricsCollector`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub icon_hits: u64,
    pub icon_misses: u64,
    pub icon_unknown: u64,
    pub icon_errors: u64,
    pub icon_render_avg_ms: f64,
    pub icon_render_max_ms: f64,
    pub snapshot_loads: u64,
    pub snapshot_failures: u64,
    pub stale_loads_dropped: u64,
    pub snapshot_load_avg_ms: f64,
    pub icon_cache: IconCacheSnapshot,
    pub icon_cache_hit_rate: f64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            icon_hits: AtomicU64::new(0),
            icon_misses: AtomicU64::new(0),
            icon_unknown: AtomicU64::new(0),
            icon_errors: AtomicU64::new(0),
            snapshot_loads: AtomicU64::new(0),
            snapshot_failures: AtomicU64::new(0),
            stale_loads: AtomicU64::new(0),
            render_times: Mutex::new(TimingStats::default()),
            load_times: Mutex::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    pub fn record_icon_request(&self, outcome: IconOutcome) {
        let counter = match outcome {
            IconOutcome::Hit => &self.icon_hits,
            IconOutcome::Miss => &self.icon_misses,
            IconOutcome::Unknown => &self.icon_unknown,
            IconOutcome::Error => &self.icon_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        counter!("icon_requests_total", "outcome" => outcome.as_str()).increment(1);
    }

    pub fn record_icon_render(&self, duration: Duration) {
        self.render_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record(duration.as_micros() as u64);
        histogram!("icon_render_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a finished snapshot load and the size of what it produced.
    pub fn record_snapshot_load(&self, outcome: PublishOutcome, duration: Duration, stations: usize) {
        self.load_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record(duration.as_micros() as u64);
        histogram!("snapshot_load_duration_seconds").record(duration.as_secs_f64());

        match outcome {
            PublishOutcome::Applied => {
                self.snapshot_loads.fetch_add(1, Ordering::Relaxed);
                counter!("snapshot_loads_total", "outcome" => "applied").increment(1);
                gauge!("station_features").set(stations as f64);
            }
            PublishOutcome::Stale => {
                self.stale_loads.fetch_add(1, Ordering::Relaxed);
                counter!("snapshot_loads_total", "outcome" => "stale").increment(1);
            }
        }
    }

    pub fn record_snapshot_failure(&self) {
        self.snapshot_failures.fetch_add(1, Ordering::Relaxed);
        counter!("snapshot_loads_total", "outcome" => "failed").increment(1);
    }

    /// Push icon cache counters to the exporter.
    pub fn record_icon_cache_stats(&self, stats: &IconCacheSnapshot) {
        gauge!("icon_cache_entries").set(stats.entry_count as f64);
        gauge!("icon_cache_size_bytes").set(stats.size_bytes as f64);
        gauge!("icon_cache_evictions_total").set(stats.evictions as f64);
        gauge!("icon_cache_hit_rate_percent").set(stats.hit_rate());
    }

    pub fn snapshot(&self, icon_cache: IconCacheSnapshot) -> MetricsSnapshot {
        let render = self.render_times.lock().unwrap_or_else(|e| e.into_inner());
        let load = self.load_times.lock().unwrap_or_else(|e| e.into_inner());

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            icon_hits: self.icon_hits.load(Ordering::Relaxed),
            icon_misses: self.icon_misses.load(Ordering::Relaxed),
            icon_unknown: self.icon_unknown.load(Ordering::Relaxed),
            icon_errors: self.icon_errors.load(Ordering::Relaxed),
            icon_render_avg_ms: render.avg_ms(),
            icon_render_max_ms: render.max_us as f64 / 1000.0,
            snapshot_loads: self.snapshot_loads.load(Ordering::Relaxed),
            snapshot_failures: self.snapshot_failures.load(Ordering::Relaxed),
            stale_loads_dropped: self.stale_loads.load(Ordering::Relaxed),
            snapshot_load_avg_ms: load.avg_ms(),
            icon_cache_hit_rate: icon_cache.hit_rate(),
            icon_cache,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
