//! Scratch folders laid out like a snapshot data directory.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::envelope;

/// A temporary directory that is removed on drop.
pub fn temp_test_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Snapshot folder with an `index.txt` and one file per snapshot.
pub struct SnapshotFolder {
    dir: TempDir,
    names: Vec<String>,
}

impl SnapshotFolder {
    pub fn new() -> Self {
        Self {
            dir: temp_test_dir(),
            names: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `{label}.json` and list it in the index.
    pub fn add_snapshot(&mut self, label: &str, stations: Vec<Value>) -> PathBuf {
        let name = format!("{}.json", label);
        let path = self.dir.path().join(&name);
        fs::write(&path, envelope(stations)).expect("failed to write snapshot");
        self.names.push(name);
        self.write_index();
        path
    }

    /// Write an arbitrary file into the folder without indexing it.
    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Replace the index with `names`, one per line.
    pub fn set_index(&mut self, names: &[&str]) {
        self.names = names.iter().map(|n| n.to_string()).collect();
        self.write_index();
    }

    fn write_index(&self) {
        let mut text = self.names.join("\n");
        text.push('\n');
        fs::write(self.dir.path().join("index.txt"), text).expect("failed to write index");
    }
}

impl Default for SnapshotFolder {
    fn default() -> Self {
        Self::new()
    }
}
