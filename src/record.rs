//! Change records as produced by the scanner / review step.
//!
//! Only `path` and `new_path` drive behavior; the remaining fields are carried
//! along for display. Scanner extras (`exif`, `pdf`, `ooxml`) are ignored.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::ApplierError;

/// One proposed rename/move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default)]
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub mod_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub new_name: String,
    pub new_path: PathBuf,
}

impl ChangeRecord {
    /// Minimal record for a plain `path -> new_path` change.
    pub fn new(path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let new_path = new_path.into();
        let name = file_name_lossy(&path);
        let new_name = file_name_lossy(&new_path);
        Self {
            name,
            path,
            size: 0,
            mod_time: None,
            is_dir: false,
            new_name,
            new_path,
        }
    }
}

fn file_name_lossy(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a JSON array of change records.
///
/// Fails on unreadable files, malformed JSON and records with an empty
/// `path` or `new_path`. Nothing is touched on disk.
pub fn load_records(path: &Path) -> Result<Vec<ChangeRecord>, ApplierError> {
    let data = fs::read(path).map_err(|source| ApplierError::RecordsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&data).map_err(|e| match e {
        ParseError::Json(source) => ApplierError::RecordsMalformed {
            path: path.to_path_buf(),
            source,
        },
        ParseError::Empty(index, field) => ApplierError::EmptyRecordField { index, field },
    })?;
    debug!(count = records.len(), file = %path.display(), "loaded change records");
    Ok(records)
}

enum ParseError {
    Json(serde_json::Error),
    Empty(usize, &'static str),
}

fn parse_records(data: &[u8]) -> Result<Vec<ChangeRecord>, ParseError> {
    let records: Vec<ChangeRecord> = serde_json::from_slice(data).map_err(ParseError::Json)?;
    for (index, rec) in records.iter().enumerate() {
        if rec.path.as_os_str().is_empty() {
            return Err(ParseError::Empty(index, "path"));
        }
        if rec.new_path.as_os_str().is_empty() {
            return Err(ParseError::Empty(index, "new_path"));
        }
    }
    Ok(records)
}
