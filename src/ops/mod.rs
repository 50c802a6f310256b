//! Batch rename engine: ordering, conflict/failure decisions, execution.

mod decide;
mod engine;
mod helpers;
mod mover;
mod operation;
mod order;
mod prompt;
mod suffix;

pub use decide::{
    Decision, DecisionPoint, DecisionProvider, PolicyDecider, ScriptedDecider, validate_file_name,
};
pub use engine::{ApplyReport, Engine, Halt, plan};
pub use helpers::{describe_io_error, io_error_with_help};
pub use mover::{FsMover, Mover};
pub use operation::{Operation, Outcome, OutcomeStatus, SkipReason};
pub use order::{BatchCollision, find_batch_collisions, order_operations};
pub use prompt::PromptDecider;
pub use suffix::suffixed_name;

use crate::record::ChangeRecord;

/// Turn records into operations and order them longest source path first.
pub fn prepare(records: Vec<ChangeRecord>) -> Vec<Operation> {
    let mut ops: Vec<Operation> = records.into_iter().map(Operation::new).collect();
    order_operations(&mut ops);
    ops
}
