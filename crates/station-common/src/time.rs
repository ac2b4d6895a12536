//! Snapshot naming and time handling.
//!
//! Snapshot files are named after the minute they were captured, e.g.
//! `2024-01-01_08:00.json`. The part before the extension is the
//! snapshot's date label and doubles as its key in historical series.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Date-time pattern embedded in snapshot filenames (interpreted as UTC).
pub const SNAPSHOT_LABEL_FORMAT: &str = "%Y-%m-%d_%H:%M";

/// Extension carried by every snapshot file.
pub const SNAPSHOT_EXTENSION: &str = ".json";

/// Name of the index file listing the snapshots of a folder.
pub const SNAPSHOT_INDEX_FILE: &str = "index.txt";

/// Split a newline-delimited snapshot index into filenames.
///
/// Blank lines are dropped and surrounding whitespace (including `\r`
/// from CRLF files) is trimmed. Order is preserved.
pub fn parse_index(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip the snapshot extension from a filename to get its date label.
pub fn date_label(file_name: &str) -> &str {
    file_name
        .strip_suffix(SNAPSHOT_EXTENSION)
        .unwrap_or(file_name)
}

/// Parse a date label (`yyyy-MM-dd_HH:mm`) as a UTC timestamp.
pub fn parse_snapshot_label(label: &str) -> Result<DateTime<Utc>, TimeParseError> {
    NaiveDateTime::parse_from_str(label, SNAPSHOT_LABEL_FORMAT)
        .map(|ndt| Utc.from_utc_datetime(&ndt))
        .map_err(|_| TimeParseError::InvalidFormat(label.to_string()))
}

/// Parse a snapshot filename (`yyyy-MM-dd_HH:mm.json`) as a UTC timestamp.
pub fn parse_snapshot_file_name(file_name: &str) -> Result<DateTime<Utc>, TimeParseError> {
    parse_snapshot_label(date_label(file_name))
}

/// Format a timestamp as a snapshot date label.
pub fn format_snapshot_label(dt: &DateTime<Utc>) -> String {
    dt.format(SNAPSHOT_LABEL_FORMAT).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid snapshot time format: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_snapshot_file_name() {
        let dt = parse_snapshot_file_name("2024-01-15_12:30.json").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rejects_other_patterns() {
        assert!(parse_snapshot_label("2024-01-15T12:30:00Z").is_err());
        assert!(parse_snapshot_label("latest").is_err());
        assert!(parse_snapshot_file_name("2024-01-15.json").is_err());
    }

    #[test]
    fn test_label_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let label = format_snapshot_label(&dt);
        assert_eq!(label, "2024-01-01_08:00");
        assert_eq!(parse_snapshot_label(&label).unwrap(), dt);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label("2024-01-01_08:00.json"), "2024-01-01_08:00");
        assert_eq!(date_label("no-extension"), "no-extension");
    }

    #[test]
    fn test_parse_index_skips_blank_lines() {
        let text = "2024-01-01_08:00.json\n\n2024-01-01_09:00.json\r\n   \n";
        assert_eq!(
            parse_index(text),
            vec!["2024-01-01_08:00.json", "2024-01-01_09:00.json"]
        );
    }
}
