//! Operations and their outcomes.
//!
//! An `Operation` never changes once built. Conflict renames are captured in
//! the `Outcome`, which is what scripts and summaries read from.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::record::ChangeRecord;

/// A change record queued for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    record: ChangeRecord,
}

impl Operation {
    pub fn new(record: ChangeRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &ChangeRecord {
        &self.record
    }

    /// Current location of the entry.
    pub fn source(&self) -> &Path {
        &self.record.path
    }

    /// Destination as originally requested.
    pub fn destination(&self) -> &Path {
        &self.record.new_path
    }
}

impl From<ChangeRecord> for Operation {
    fn from(record: ChangeRecord) -> Self {
        Self::new(record)
    }
}

/// Why an operation was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Destination was occupied and the decision was to skip.
    Conflict,
    /// The rename failed and the decision was to skip; holds the error text.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Moved to the requested destination.
    Applied,
    /// Moved, but to a destination chosen while resolving a conflict.
    Renamed,
    Skipped(SkipReason),
    /// Never reached because the batch was halted.
    NotAttempted,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Applied => f.write_str("applied"),
            OutcomeStatus::Renamed => f.write_str("renamed"),
            OutcomeStatus::Skipped(SkipReason::Conflict) => f.write_str("skipped (conflict)"),
            OutcomeStatus::Skipped(SkipReason::Failed(_)) => f.write_str("skipped (error)"),
            OutcomeStatus::NotAttempted => f.write_str("not attempted"),
        }
    }
}

/// Final state of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub record: ChangeRecord,
    /// Where the entry actually ended up (or would have, for skips).
    pub destination: PathBuf,
    pub status: OutcomeStatus,
}

impl Outcome {
    pub(crate) fn completed(op: &Operation, destination: PathBuf) -> Self {
        let status = if destination == op.destination() {
            OutcomeStatus::Applied
        } else {
            OutcomeStatus::Renamed
        };
        Self {
            record: op.record.clone(),
            destination,
            status,
        }
    }

    pub(crate) fn skipped(op: &Operation, destination: PathBuf, reason: SkipReason) -> Self {
        Self {
            record: op.record.clone(),
            destination,
            status: OutcomeStatus::Skipped(reason),
        }
    }

    pub(crate) fn not_attempted(op: Operation) -> Self {
        let destination = op.record.new_path.clone();
        Self {
            record: op.record,
            destination,
            status: OutcomeStatus::NotAttempted,
        }
    }

    pub fn source(&self) -> &Path {
        &self.record.path
    }

    pub fn requested(&self) -> &Path {
        &self.record.new_path
    }

    /// True when the entry now lives at `destination`.
    pub fn is_applied(&self) -> bool {
        matches!(self.status, OutcomeStatus::Applied | OutcomeStatus::Renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_marks_renamed_when_destination_differs() {
        let op = Operation::new(ChangeRecord::new("a.txt", "out.txt"));
        assert_eq!(
            Outcome::completed(&op, PathBuf::from("out.txt")).status,
            OutcomeStatus::Applied
        );
        let o = Outcome::completed(&op, PathBuf::from("out2.txt"));
        assert_eq!(o.status, OutcomeStatus::Renamed);
        assert!(o.is_applied());
        assert_eq!(o.requested(), Path::new("out.txt"));
    }

    #[test]
    fn not_attempted_keeps_requested_destination() {
        let op = Operation::new(ChangeRecord::new("a", "b"));
        let o = Outcome::not_attempted(op);
        assert_eq!(o.destination, PathBuf::from("b"));
        assert!(!o.is_applied());
    }
}
