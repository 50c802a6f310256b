//! Sequential execution of an ordered batch.
//!
//! Each operation goes through: conflict check (loop while occupied), rename,
//! and on failure a retry/skip loop. Per-operation failures never stop the
//! batch; only `Abort`, a shutdown request or a dead decision channel do, and
//! even then the report still lists what was applied so scripts can be
//! written for it.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::ApplierError;
use crate::output as out;
use crate::shutdown;

use super::decide::{Decision, DecisionPoint, DecisionProvider, validate_file_name};
use super::helpers::describe_io_error;
use super::mover::Mover;
use super::operation::{Operation, Outcome, SkipReason};

/// Why a batch stopped early.
#[derive(Debug)]
pub enum Halt {
    /// The decision provider chose `Abort`.
    Aborted,
    /// SIGINT/SIGTERM was received.
    Interrupted,
    /// The decision channel failed (closed stdin, read error).
    DecisionFailed(ApplierError),
}

/// One outcome per input operation, in processing order.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub outcomes: Vec<Outcome>,
    pub halt: Option<Halt>,
}

impl ApplyReport {
    /// Outcomes that moved something, in completion order.
    pub fn applied(&self) -> impl DoubleEndedIterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_applied())
    }

    pub fn applied_count(&self) -> usize {
        self.applied().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, super::OutcomeStatus::Skipped(_)))
            .count()
    }

    pub fn not_attempted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, super::OutcomeStatus::NotAttempted))
            .count()
    }
}

/// Dry run: every operation counts as applied to its requested destination.
/// Neither the filesystem nor any decision provider is consulted.
pub fn plan(operations: Vec<Operation>) -> ApplyReport {
    let outcomes = operations
        .iter()
        .map(|op| {
            info!(src = %op.source().display(), dest = %op.destination().display(), "dry-run: would rename");
            Outcome::completed(op, op.destination().to_path_buf())
        })
        .collect();
    ApplyReport {
        outcomes,
        halt: None,
    }
}

pub struct Engine<M, D> {
    mover: M,
    decider: D,
}

impl<M: Mover, D: DecisionProvider> Engine<M, D> {
    pub fn new(mover: M, decider: D) -> Self {
        Self { mover, decider }
    }

    pub fn decider(&self) -> &D {
        &self.decider
    }

    pub fn into_decider(self) -> D {
        self.decider
    }

    /// Apply `operations` in the given order.
    pub fn apply(&mut self, operations: Vec<Operation>) -> ApplyReport {
        let mut report = ApplyReport {
            outcomes: Vec::with_capacity(operations.len()),
            halt: None,
        };
        let mut pending = operations.into_iter();

        for op in pending.by_ref() {
            if shutdown::is_requested() {
                report.outcomes.push(Outcome::not_attempted(op));
                report.halt = Some(Halt::Interrupted);
                break;
            }

            out::print_user(&format!(
                "Processing: {} -> {}",
                op.source().display(),
                op.destination().display()
            ));
            match self.process(&op) {
                Ok(outcome) => {
                    announce(&outcome);
                    report.outcomes.push(outcome);
                }
                Err(halt) => {
                    warn!(src = %op.source().display(), reason = ?halt, "batch halted");
                    report.outcomes.push(Outcome::not_attempted(op));
                    report.halt = Some(halt);
                    break;
                }
            }
        }

        report.outcomes.extend(pending.map(Outcome::not_attempted));
        report
    }

    fn ask(&mut self, point: &DecisionPoint<'_>) -> Result<Decision, Halt> {
        let decision = self.decider.resolve(point).map_err(|e| {
            // A prompt torn down by Ctrl-C is an interruption, not a broken channel.
            if shutdown::is_requested() {
                Halt::Interrupted
            } else {
                Halt::DecisionFailed(e)
            }
        })?;
        if shutdown::is_requested() {
            return Err(Halt::Interrupted);
        }
        debug!(?decision, "decision");
        Ok(decision)
    }

    fn process(&mut self, op: &Operation) -> Result<Outcome, Halt> {
        let src = op.source();
        let mut dest = op.destination().to_path_buf();

        while self.mover.occupied(&dest) {
            out::print_user(&format!(
                "  - CONFLICT: Destination '{}' already exists.",
                dest.display()
            ));
            let point = DecisionPoint::Conflict {
                source: src,
                destination: &dest,
            };
            match self.ask(&point)? {
                Decision::Skip => return Ok(Outcome::skipped(op, dest, SkipReason::Conflict)),
                Decision::Abort => return Err(Halt::Aborted),
                Decision::RenameTo(name) => match validate_file_name(&name) {
                    Ok(()) => {
                        dest = sibling(&dest, &name);
                        out::print_user(&format!("    -> New path: {}", dest.display()));
                    }
                    Err(reason) => self.decider.rejected(&reason),
                },
                Decision::Retry => self
                    .decider
                    .rejected("Retry is not available for a conflict; choose Skip or Rename."),
            }
        }

        let mut attempt: u32 = 1;
        loop {
            let err = match self.mover.rename(src, &dest) {
                Ok(()) => {
                    info!(src = %src.display(), dest = %dest.display(), attempt, "renamed");
                    return Ok(Outcome::completed(op, dest));
                }
                Err(e) => e,
            };

            let detail = describe_io_error("rename", src, &err);
            warn!(error = %detail, dest = %dest.display(), attempt, "rename failed");
            out::print_user(&format!("  - ERROR: Could not rename {detail}"));

            loop {
                let point = DecisionPoint::Failure {
                    source: src,
                    destination: &dest,
                    error: &err,
                    attempt,
                };
                match self.ask(&point)? {
                    Decision::Retry => {
                        out::print_user("    -> Retrying...");
                        attempt = attempt.saturating_add(1);
                        break;
                    }
                    Decision::Skip => {
                        return Ok(Outcome::skipped(op, dest, SkipReason::Failed(detail)));
                    }
                    Decision::Abort => return Err(Halt::Aborted),
                    Decision::RenameTo(_) => self
                        .decider
                        .rejected("Rename is only available for a conflict; choose Retry or Skip."),
                }
            }
        }
    }
}

/// `parent(dest)/name`.
fn sibling(dest: &Path, name: &str) -> PathBuf {
    match dest.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

fn announce(outcome: &Outcome) {
    use super::OutcomeStatus::*;
    match &outcome.status {
        Applied => out::print_user("    -> Done."),
        Renamed => out::print_user(&format!(
            "    -> Done (renamed to {}).",
            outcome.destination.display()
        )),
        Skipped(_) => out::print_user("    -> Skipped."),
        NotAttempted => {}
    }
}
