//! Command-line arguments and the optional YAML service file.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use renderer::IconStyle;

/// Station occupancy map server
#[derive(Parser, Debug, Clone)]
#[command(name = "map-api")]
#[command(about = "Bike-share station occupancy map server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "MAP_LISTEN_ADDR")]
    pub listen: String,

    /// Folder or base URL holding index.txt and the snapshot files
    #[arg(long, default_value = "./stations", env = "SNAPSHOT_ROOT")]
    pub snapshot_root: String,

    /// Location of the snapshot index, relative to the snapshot root
    #[arg(long, default_value = "index.txt", env = "SNAPSHOT_INDEX")]
    pub snapshot_index: String,

    /// Station registry document, relative to the snapshot root or an absolute URL
    #[arg(long, default_value = "station_information.json", env = "STATION_REGISTRY")]
    pub registry: String,

    /// Live station status endpoint; adds a live entry after the historical snapshots
    #[arg(long, env = "LIVE_STATUS_URL")]
    pub live_status: Option<String>,

    /// YAML file with icon style and cache settings
    #[arg(long, env = "MAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Icon cache size in kilobytes (overrides the config file)
    #[arg(long, env = "ICON_CACHE_SIZE_KB")]
    pub icon_cache_kb: Option<usize>,

    /// Timeout for snapshot and registry fetches, in seconds
    #[arg(long, default_value = "30", env = "FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "MAP_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Args {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

const DEFAULT_ICON_CACHE_KB: usize = 16 * 1024;

/// Settings read from the optional YAML service file.
///
/// ```yaml
/// icon_cache_kb: 8192
/// style:
///   size: 32
///   mechanical: "#80c664"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub icon_cache_kb: usize,
    pub style: IconStyle,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            icon_cache_kb: DEFAULT_ICON_CACHE_KB,
            style: IconStyle::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: ServiceConfig = serde_yaml::from_str(text).context("Invalid service config")?;
        config.style.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml(&text).with_context(|| format!("Failed to parse: {:?}", path))?;

        tracing::info!(
            path = %path.display(),
            icon_size = config.style.size,
            icon_cache_kb = config.icon_cache_kb,
            "Loaded service config"
        );
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(kb) = args.icon_cache_kb {
            self.icon_cache_kb = kb;
        }
        self
    }
}
