//! Log readers for the benchmark's delimited text formats.
//!
//! Every format is comma-separated. Files written by the benchmark runner
//! carry a header line prefixed with `#`; the header is validated against the
//! expected schema once, before any row is parsed. Scraper outputs (CPU and
//! per-tenant rate samples) are headerless.

use crate::error::ReportError;
use crate::model::{CpuSample, CreationRecord, EventRecord, RateSample, StageDelayRecord};
use log::debug;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

const CREATION_HEADER: &[&str] = &["podName", "creationTimestamp", "readyTimestamp"];
const STAGE_DELAY_HEADER: &[&str] = &[
    "podName",
    "dwsQDelay",
    "dwsProcessDelay",
    "superCreationTime",
    "uwsQDelay",
    "tenantUpdateTime",
    "total",
];
const EVENT_HEADER: &[&str] = &[
    "podName",
    "tenantCreation",
    "dwsDequeue",
    "superCreation",
    "superReady",
    "uwsDequeue",
    "tenantUpdate",
];

/// Read a creation log (`.data`).
pub fn read_creation_log(path: &Path) -> Result<Vec<CreationRecord>, ReportError> {
    read_with_header(path, CREATION_HEADER)
}

/// Read a stage-delay log (`.diff`).
pub fn read_stage_delay_log(path: &Path) -> Result<Vec<StageDelayRecord>, ReportError> {
    read_with_header(path, STAGE_DELAY_HEADER)
}

/// Read an event log (`.log`).
pub fn read_event_log(path: &Path) -> Result<Vec<EventRecord>, ReportError> {
    read_with_header(path, EVENT_HEADER)
}

/// Read headerless CPU samples (`.dat`): `<label>,<cpu seconds>` per line.
pub fn read_cpu_samples(path: &Path) -> Result<Vec<CpuSample>, ReportError> {
    let rows: Vec<(String, f64)> = read_headerless(path)?;
    Ok(rows
        .into_iter()
        .map(|(label, cpu_seconds)| CpuSample {
            label,
            cpu_seconds,
        })
        .collect())
}

/// Read headerless per-tenant rate samples: `<tenant>,<rate>` per line.
/// Row order is preserved; the caller relies on it.
pub fn read_rate_samples(path: &Path) -> Result<Vec<RateSample>, ReportError> {
    let rows: Vec<(String, f64)> = read_headerless(path)?;
    Ok(rows
        .into_iter()
        .map(|(tenant, rate)| RateSample { tenant, rate })
        .collect())
}

fn open(path: &Path) -> Result<File, ReportError> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReportError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReportError::Parse {
                path: path.to_path_buf(),
                line: 0,
                reason: e.to_string(),
            }
        }
    })
}

/// Parse a file whose first line is a `#`-prefixed header, after checking the
/// header names against `expected`. Rows are deserialized by field name.
fn read_with_header<T: DeserializeOwned>(
    path: &Path,
    expected: &[&str],
) -> Result<Vec<T>, ReportError> {
    let file = open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = rdr.headers().map_err(|e| csv_error(path, e))?;
    let found: Vec<String> = headers
        .iter()
        .enumerate()
        // The runner writes the header as a comment line, e.g. `#podName,...`.
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('#').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    if found != expected {
        return Err(ReportError::Schema {
            path: path.to_path_buf(),
            expected: expected.join(","),
            found: found.join(","),
        });
    }
    // Re-point serde at the names with the `#` stripped.
    rdr.set_headers(csv::StringRecord::from(expected.to_vec()));

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: T = row.map_err(|e| csv_error(path, e))?;
        records.push(record);
    }
    debug!("{}: {} records", path.display(), records.len());
    Ok(records)
}

/// Parse a headerless file into positionally-typed rows.
fn read_headerless<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ReportError> {
    let file = open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: T = row.map_err(|e| csv_error(path, e))?;
        records.push(record);
    }
    debug!("{}: {} records", path.display(), records.len());
    Ok(records)
}

fn csv_error(path: &Path, e: csv::Error) -> ReportError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    ReportError::Parse {
        path: path.to_path_buf(),
        line,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn creation_log_returns_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "s.data",
            "#podName,creationTimestamp,readyTimestamp\n\
             pod-0,100,105\n\
             pod-1,101,109\n\
             pod-2,102,104\n",
        );
        let records = read_creation_log(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].pod_name, "pod-0");
        assert_eq!(records[1].latency(), 8);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_creation_log(&dir.path().join("nope.data")).unwrap_err();
        assert!(matches!(err, ReportError::NotFound { .. }));
    }

    #[test]
    fn wrong_header_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "s.data", "#podName,started,finished\np,1,2\n");
        let err = read_creation_log(&path).unwrap_err();
        assert!(matches!(err, ReportError::Schema { .. }));
    }

    #[test]
    fn non_numeric_field_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "s.data",
            "#podName,creationTimestamp,readyTimestamp\npod-0,abc,105\n",
        );
        let err = read_creation_log(&path).unwrap_err();
        match err {
            ReportError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn short_row_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "s.data",
            "#podName,creationTimestamp,readyTimestamp\npod-0,100\n",
        );
        assert!(matches!(
            read_creation_log(&path).unwrap_err(),
            ReportError::Parse { .. }
        ));
    }

    #[test]
    fn stage_delay_log_parses_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "s.diff",
            "#podName,dwsQDelay,dwsProcessDelay,superCreationTime,uwsQDelay,tenantUpdateTime,total\n\
             pod-0,1,2,3,4,5,15\n",
        );
        let records = read_stage_delay_log(&path).unwrap();
        assert_eq!(records[0].uws_queue_delay, 4);
        assert_eq!(records[0].total, 15);
    }

    #[test]
    fn cpu_samples_have_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "cpu.dat", "1250,12.5\n2500,31.0\n");
        let samples = read_cpu_samples(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].label, "2500");
        assert!((samples[1].cpu_seconds - 31.0).abs() < f64::EPSILON);
    }
}
