//! Core library for `filesense_applier`.
//!
//! Takes a reviewed list of change records, orders them so nested paths are
//! handled before their parents, applies each rename with operator (or policy)
//! driven conflict/failure resolution, and writes a changelog script plus an
//! exact revert script for whatever was actually applied.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ops;
pub mod output;
pub mod platform;
pub mod record;
pub mod script;
pub mod shutdown;
mod utils;

pub use config::{Config, ConflictPolicy, FailurePolicy, LogLevel};
pub use config::{default_config_path, path_has_symlink_ancestor};
pub use errors::ApplierError;
pub use ops::{
    ApplyReport, Decision, DecisionPoint, DecisionProvider, Engine, FsMover, Halt, Mover,
    Operation, Outcome, OutcomeStatus, PolicyDecider, PromptDecider, ScriptedDecider,
};
pub use record::{ChangeRecord, load_records};
pub use script::{ScriptPair, Shell, write_scripts};
