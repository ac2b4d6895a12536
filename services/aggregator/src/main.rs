//! Station snapshot aggregator.
//!
//! Reads every snapshot listed in a folder's `index.txt` and writes one
//! `{station_id}.json` history per station:
//!
//! ```text
//! station-aggregator ./stations ./aggregate
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "station-aggregator")]
#[command(about = "Aggregate station snapshots into per-station time series")]
struct Args {
    /// Folder holding index.txt and the snapshot files it lists
    stations: Option<String>,

    /// Folder receiving one {station_id}.json per station
    aggregate: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

impl Args {
    /// Both folders, with an empty argument counted as missing.
    fn folders(&self) -> Result<(PathBuf, PathBuf), &'static str> {
        let stations = non_empty(&self.stations).ok_or("Stations folder required")?;
        let aggregate = non_empty(&self.aggregate).ok_or("Aggregate folder required")?;
        Ok((stations, aggregate))
    }
}

fn non_empty(arg: &Option<String>) -> Option<PathBuf> {
    arg.as_deref().filter(|s| !s.is_empty()).map(PathBuf::from)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let (stations, aggregate) = match args.folders() {
        Ok(folders) => folders,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .json()
        .init();

    match run(stations, aggregate).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Aggregation failed");
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(stations: PathBuf, aggregate: PathBuf) -> anyhow::Result<()> {
    info!(stations = %stations.display(), aggregate = %aggregate.display(), "Starting aggregation");
    let report = ingestion::aggregate(&stations, &aggregate).await?;
    info!(
        snapshots = report.snapshots,
        stations = report.stations,
        records = report.records,
        "Wrote station histories"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{status_json, SnapshotFolder};

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_missing_stations_folder() {
        let args = parse(&["station-aggregator"]);
        assert_eq!(args.folders().unwrap_err(), "Stations folder required");
    }

    #[test]
    fn test_missing_aggregate_folder() {
        let args = parse(&["station-aggregator", "./stations"]);
        assert_eq!(args.folders().unwrap_err(), "Aggregate folder required");
    }

    #[test]
    fn test_both_folders() {
        let args = parse(&["station-aggregator", "./stations", "./aggregate"]);
        let (stations, aggregate) = args.folders().unwrap();
        assert_eq!(stations, PathBuf::from("./stations"));
        assert_eq!(aggregate, PathBuf::from("./aggregate"));
    }

    #[test]
    fn test_empty_folders_count_as_missing() {
        let args = parse(&["station-aggregator", "", "./aggregate"]);
        assert_eq!(args.folders().unwrap_err(), "Stations folder required");

        let args = parse(&["station-aggregator", "./stations", ""]);
        assert_eq!(args.folders().unwrap_err(), "Aggregate folder required");
    }

    #[tokio::test]
    async fn test_run_writes_histories() {
        let mut folder = SnapshotFolder::new();
        folder.add_snapshot("2021-01-01_10:00", vec![status_json(123, 3, 1, 8)]);
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("aggregate");

        run(folder.path().to_path_buf(), target.clone()).await.unwrap();
        assert!(target.join("123.json").exists());
    }

    #[tokio::test]
    async fn test_run_fails_without_index() {
        let empty = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        assert!(run(empty.path().to_path_buf(), out.path().join("aggregate")).await.is_err());
    }
}
