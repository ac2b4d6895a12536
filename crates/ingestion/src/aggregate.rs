//! Offline reshaping of snapshot-major files into per-station histories.
//!
//! Every snapshot listed in the folder's `index.txt` is read and each station
//! record is filed under `result[station_id][date_label]`. Records are kept
//! as raw JSON so the output carries exactly what the source files held.
//!
//! All reads complete before anything is written. Output is first written to
//! a staging folder next to the destination, which then replaces the old
//! folder; a failed run leaves the previous output untouched.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use station_common::time::{self, SNAPSHOT_INDEX_FILE};
use station_common::{RawStationStatus, StationEnvelope, StationError, StationResult};
use storage::{FsSource, SnapshotSource};

/// Date label to raw record, for one station.
pub type HistoricalSeries = Map<String, Value>;

/// Summary of an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    pub snapshots: usize,
    pub stations: usize,
    pub records: usize,
    pub output: PathBuf,
}

/// Per-station histories accumulated in memory.
#[derive(Debug, Default)]
pub struct Aggregation {
    series: BTreeMap<u64, HistoricalSeries>,
    snapshots: usize,
    records: usize,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// File every record of the snapshot `file_name` under its date label.
    ///
    /// A malformed document or a record without a usable `station_id` is a
    /// [`StationError::SourceReadError`] naming `file_name`.
    pub fn add_snapshot(&mut self, file_name: &str, text: &str) -> StationResult<()> {
        let date_label = time::date_label(file_name);
        let records: Vec<Value> =
            StationEnvelope::parse(text).map_err(|e| StationError::source_read(file_name, e))?;

        for record in records {
            let station_id = station_id_of(&record).ok_or_else(|| {
                StationError::source_read(file_name, format!("record without a valid station_id: {}", record))
            })?;
            self.series
                .entry(station_id)
                .or_default()
                .insert(date_label.to_string(), record);
            self.records += 1;
        }
        self.snapshots += 1;
        Ok(())
    }

    pub fn series(&self, station_id: u64) -> Option<&HistoricalSeries> {
        self.series.get(&station_id)
    }

    pub fn station_count(&self) -> usize {
        self.series.len()
    }
}

fn station_id_of(record: &Value) -> Option<u64> {
    match record.get("station_id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Read every snapshot listed in `snapshot_folder` and write one
/// `{station_id}.json` history per station into `output_folder`.
///
/// Fails with [`StationError::SourceReadError`] if the index or any listed
/// snapshot is missing or malformed, and with [`StationError::WriteError`]
/// if the output cannot be written. In both cases an existing
/// `output_folder` is left as it was.
#[instrument(skip_all, fields(source = %snapshot_folder.display(), output = %output_folder.display()))]
pub async fn aggregate(snapshot_folder: &Path, output_folder: &Path) -> StationResult<AggregateReport> {
    let start = Instant::now();
    let source = FsSource::new(snapshot_folder);

    let index = source.fetch_text(SNAPSHOT_INDEX_FILE).await?;
    let files = time::parse_index(&index);
    info!(snapshots = files.len(), "Aggregating snapshot folder");

    let mut aggregation = Aggregation::new();
    for file in &files {
        let text = source.fetch_text(file).await?;
        aggregation.add_snapshot(file, &text)?;
        debug!(file = %file, "Read snapshot");
    }

    write_output(&aggregation, output_folder).await?;

    let report = AggregateReport {
        snapshots: aggregation.snapshots,
        stations: aggregation.station_count(),
        records: aggregation.records,
        output: output_folder.to_path_buf(),
    };
    info!(
        snapshots = report.snapshots,
        stations = report.stations,
        records = report.records,
        duration_ms = start.elapsed().as_millis() as u64,
        "Aggregation complete"
    );
    Ok(report)
}

fn staging_path(output_folder: &Path) -> PathBuf {
    let name = output_folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "aggregate".to_string());
    output_folder.with_file_name(format!(".{}.staging", name))
}

async fn write_output(aggregation: &Aggregation, output_folder: &Path) -> StationResult<()> {
    let write_err = |what: &str, path: &Path, e: std::io::Error| {
        StationError::WriteError(format!("{} {}: {}", what, path.display(), e))
    };

    let staging = staging_path(output_folder);
    if fs::metadata(&staging).await.is_ok() {
        warn!(path = %staging.display(), "Removing leftover staging folder");
        fs::remove_dir_all(&staging)
            .await
            .map_err(|e| write_err("Failed to clear", &staging, e))?;
    }
    fs::create_dir_all(&staging)
        .await
        .map_err(|e| write_err("Failed to create", &staging, e))?;

    for (station_id, series) in &aggregation.series {
        let path = staging.join(format!("{}.json", station_id));
        let body = serde_json::to_vec(series)?;
        fs::write(&path, body)
            .await
            .map_err(|e| write_err("Failed to write", &path, e))?;
    }

    if fs::metadata(output_folder).await.is_ok() {
        fs::remove_dir_all(output_folder)
            .await
            .map_err(|e| write_err("Failed to clear", output_folder, e))?;
    }
    fs::rename(&staging, output_folder)
        .await
        .map_err(|e| write_err("Failed to move output to", output_folder, e))?;
    Ok(())
}

/// Read back one station's history as written by [`aggregate`].
pub async fn read_series(output_folder: &Path, station_id: u64) -> StationResult<HistoricalSeries> {
    let source = FsSource::new(output_folder);
    let text = source.fetch_text(&format!("{}.json", station_id)).await?;
    Ok(serde_json::from_str(&text)?)
}

/// Decode a history's records into typed status records.
pub fn typed_series(series: &HistoricalSeries) -> StationResult<BTreeMap<String, RawStationStatus>> {
    series
        .iter()
        .map(|(label, record)| -> StationResult<(String, RawStationStatus)> {
            Ok((label.clone(), serde_json::from_value(record.clone())?))
        })
        .collect()
}
