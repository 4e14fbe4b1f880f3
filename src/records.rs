//! CSV records going in and out of a partitioning run.
//!
//! Input rows carry `user_id,latitude,longitude`. A run writes one
//! `uid,gid,latitude,longitude` row per location and one
//! `gid,latitude,longitude` row per group.

use crate::identity::{GroupID, LocationID};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const REQUIRED_COLUMNS: [&str; 3] = ["user_id", "latitude", "longitude"];

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cannot read input {}: {source}", .path.display())]
    SourceUnavailable { path: PathBuf, source: io::Error },

    /// Missing columns or fields, or a coordinate that is not a finite number.
    #[error("malformed record{}: {reason}", line_suffix(.line))]
    MalformedRecord { line: Option<u64>, reason: String },

    #[error("cannot write output {}: {reason}", .path.display())]
    DestinationUnavailable { path: PathBuf, reason: String },
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(l) => format!(" at line {}", l),
        None => String::new(),
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LocationRecord {
    pub user_id: LocationID,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub uid: LocationID,
    pub gid: GroupID,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterRecord {
    pub gid: GroupID,
    pub latitude: f64,
    pub longitude: f64,
}

pub fn read_locations(path: &Path) -> Result<Vec<LocationRecord>, RecordError> {
    let file = File::open(path).map_err(|source| RecordError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let locations = parse_locations(file)?;
    debug!(path = %path.display(), count = locations.len(), "read locations");
    Ok(locations)
}

/*
The header line must name every required column. Extra columns are ignored.
Latitude and longitude must parse as finite floats.
*/
pub fn parse_locations<R: Read>(input: R) -> Result<Vec<LocationRecord>, RecordError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);

    let headers = reader.headers().map_err(malformed)?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .cloned()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(RecordError::MalformedRecord {
            line: Some(1),
            reason: format!("header lacks column(s) {}", missing.join(", ")),
        });
    }

    let mut locations = Vec::new();
    for row in reader.deserialize::<LocationRecord>() {
        let record = row.map_err(malformed)?;
        if !record.latitude.is_finite() || !record.longitude.is_finite() {
            return Err(RecordError::MalformedRecord {
                line: Some(locations.len() as u64 + 2),
                reason: format!("coordinates of `{}` are not finite numbers", record.user_id),
            });
        }
        locations.push(record);
    }
    Ok(locations)
}

fn malformed(e: csv::Error) -> RecordError {
    let line = e.position().map(|p| p.line());
    RecordError::MalformedRecord {
        line,
        reason: match e.kind() {
            csv::ErrorKind::Deserialize { err, .. } => match err.field() {
                Some(field) => format!("field {}: {}", field + 1, err.kind()),
                None => err.kind().to_string(),
            },
            _ => e.to_string(),
        },
    }
}

pub fn render_csv<T: Serialize>(rows: &[T], headers: &[&str]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

pub fn position_csv(rows: &[PositionRecord]) -> Result<Vec<u8>, csv::Error> {
    render_csv(rows, &["uid", "gid", "latitude", "longitude"])
}

pub fn center_csv(rows: &[CenterRecord]) -> Result<Vec<u8>, csv::Error> {
    render_csv(rows, &["gid", "latitude", "longitude"])
}

/// Writes every `(path, contents)` pair, or none of them. Files already
/// written are removed again when a later one fails.
pub fn write_all_or_nothing(outputs: &[(PathBuf, Vec<u8>)]) -> Result<(), RecordError> {
    for (done, (path, contents)) in outputs.iter().enumerate() {
        if let Err(e) = write_file(path, contents) {
            for (written, _) in outputs[..done].iter() {
                if let Err(rm) = fs::remove_file(written) {
                    warn!(path = %written.display(), error = %rm, "could not remove partial output");
                }
            }
            return Err(RecordError::DestinationUnavailable {
                path: path.clone(),
                reason: e.to_string(),
            });
        }
        debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut f = File::create(path)?;
    if let Err(e) = f.write_all(contents).and_then(|_| f.sync_all()) {
        drop(f);
        let _ = fs::remove_file(path);
        return Err(e);
    }
    Ok(())
}
