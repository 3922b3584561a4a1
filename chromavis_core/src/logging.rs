//! JSON-lines run journal.
//!
//! Each call appends one summary object to the given file. Nothing in the
//! core writes to the journal implicitly.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::distance::{DistanceRecord, DistanceSource};
use crate::space::{ColourSpaceRecord, SpaceId};

fn ensure_parent<P: AsRef<Path>>(path: P) -> io::Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
pub struct DistanceLogEntry {
    pub source: DistanceSource,
    pub pairs: usize,
    pub mean_ds: Option<f64>,
    pub max_ds: Option<f64>,
    pub mean_dl: Option<f64>,
    pub reference_pairs: usize,
    pub diagnostics: Vec<String>,
    pub timestamp_ms: u128,
}

impl DistanceLogEntry {
    pub fn from_record(record: &DistanceRecord) -> Self {
        let ds: Vec<f64> = record.pairs().iter().map(|p| p.ds).collect();
        let dl: Vec<f64> = record.pairs().iter().filter_map(|p| p.dl).collect();
        Self {
            source: record.source(),
            pairs: record.len(),
            mean_ds: mean(&ds),
            max_ds: ds.iter().copied().reduce(f64::max),
            mean_dl: mean(&dl),
            reference_pairs: record.reference().map_or(0, |r| r.len()),
            diagnostics: record.diagnostics().iter().map(|d| d.to_string()).collect(),
            timestamp_ms: timestamp_ms(),
        }
    }
}

/// Append a summary of `record` to the journal at `path`.
pub fn log_distance_summary<P: AsRef<Path>>(path: P, record: &DistanceRecord) -> io::Result<()> {
    ensure_parent(&path)?;
    append_json_line(path, &DistanceLogEntry::from_record(record))
}

#[derive(Debug, Serialize)]
pub struct ProjectionLogEntry {
    pub space: SpaceId,
    pub samples: usize,
    pub mean_r_vec: Option<f64>,
    pub diagnostics: Vec<String>,
    pub timestamp_ms: u128,
}

/// Append a summary of a projection to the journal at `path`.
pub fn log_projection_summary<P: AsRef<Path>>(path: P, record: &ColourSpaceRecord) -> io::Result<()> {
    ensure_parent(&path)?;
    let r: Vec<f64> = record.descriptors().iter().map(|d| d.r_vec).collect();
    let entry = ProjectionLogEntry {
        space: record.space(),
        samples: record.len(),
        mean_r_vec: mean(&r),
        diagnostics: record.diagnostics().iter().map(|d| d.to_string()).collect(),
        timestamp_ms: timestamp_ms(),
    };
    append_json_line(path, &entry)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
