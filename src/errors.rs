//! Typed error definitions for filesense_applier.
//! Provides a small set of well-known failure modes for better logs, exit
//! diagnostics and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplierError {
    #[error("Cannot read change list {path}: {source}")]
    RecordsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed change list {path}: {source}")]
    RecordsMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Change record #{index} has an empty {field}")]
    EmptyRecordField { index: usize, field: &'static str },

    #[error("Cannot write {label} script {path}: {source}")]
    ScriptWrite {
        label: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decision input closed before an answer was given")]
    PromptClosed,

    #[error("Failed to read decision input: {0}")]
    PromptIo(#[source] std::io::Error),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl ApplierError {
    /// Stable numeric code for log correlation.
    pub fn code(&self) -> u16 {
        match self {
            ApplierError::RecordsUnreadable { .. } => 10,
            ApplierError::RecordsMalformed { .. } => 11,
            ApplierError::EmptyRecordField { .. } => 12,
            ApplierError::ScriptWrite { .. } => 20,
            ApplierError::PromptClosed => 30,
            ApplierError::PromptIo(_) => 31,
            ApplierError::Interrupted => 130,
        }
    }
}
