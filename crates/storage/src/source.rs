//! Where snapshot indexes, snapshot files and the station registry come from.
//!
//! Every document is fetched as text through [`SnapshotSource`]. Relative
//! locations are resolved against the source's root (a folder or a base URL);
//! absolute `http(s)://` locations bypass the root when the source speaks
//! HTTP.

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use station_common::{StationError, StationResult};

/// Text document source.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the document at `location`.
    ///
    /// Fails with [`StationError::SourceReadError`] when the document cannot
    /// be read.
    async fn fetch_text(&self, location: &str) -> StationResult<String>;

    /// Human-readable root of this source, for logs.
    fn describe(&self) -> String;
}

/// Source backed by a local folder.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl SnapshotSource for FsSource {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch_text(&self, location: &str) -> StationResult<String> {
        let path = self.root.join(location);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StationError::source_read(path.display().to_string(), e))?;
        debug!(bytes = text.len(), "Read document");
        Ok(text)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Source backed by an HTTP server.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StationResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StationError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for `location`.
    pub fn url_for(&self, location: &str) -> String {
        if is_http_url(location) {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    #[instrument(skip(self))]
    async fn fetch_text(&self, location: &str) -> StationResult<String> {
        let url = self.url_for(location);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StationError::source_read(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StationError::source_read(&url, format!("HTTP {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| StationError::source_read(&url, e))?;
        debug!(url = %url, bytes = text.len(), "Fetched document");
        Ok(text)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Whether `location` is an absolute HTTP(S) URL.
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick a source for `root`: HTTP for URLs, the filesystem otherwise.
pub fn source_for(root: &str, timeout: Duration) -> StationResult<Arc<dyn SnapshotSource>> {
    if is_http_url(root) {
        Ok(Arc::new(HttpSource::new(root, timeout)?))
    } else {
        Ok(Arc::new(FsSource::new(root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_source_reads_relative_location() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.txt"), "a.json\n").unwrap();

        let source = FsSource::new(dir.path());
        let text = source.fetch_text("index.txt").await.unwrap();
        assert_eq!(text, "a.json\n");
    }

    #[tokio::test]
    async fn test_fs_source_missing_file_is_source_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(dir.path());

        let err = source.fetch_text("missing.json").await.unwrap_err();
        match err {
            StationError::SourceReadError { path, .. } => assert!(path.ends_with("missing.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_url_for() {
        let source = HttpSource::new("https://data.example.org/rawdata/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.url_for("index.txt"),
            "https://data.example.org/rawdata/index.txt"
        );
        assert_eq!(
            source.url_for("https://live.example.org/status.json"),
            "https://live.example.org/status.json"
        );
    }

    #[test]
    fn test_source_for_picks_backend() {
        let fs = source_for("./rawdata", Duration::from_secs(5)).unwrap();
        assert_eq!(fs.describe(), "./rawdata");
        let http = source_for("http://localhost:9000/data", Duration::from_secs(5)).unwrap();
        assert_eq!(http.describe(), "http://localhost:9000/data");
    }
}
