//! Conflict and failure decisions.
//!
//! The engine never reads input itself. At each decision point it asks a
//! `DecisionProvider`, which may be an operator at a terminal
//! (`PromptDecider`), a deterministic unattended policy (`PolicyDecider`) or a
//! fixed list of answers (`ScriptedDecider`).

use std::collections::VecDeque;
use std::io;
use std::path::Path;

use crate::config::{ConflictPolicy, FailurePolicy};
use crate::errors::ApplierError;

use super::suffix::suffixed_name;

/// What to do at a decision point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave this operation alone and move on.
    Skip,
    /// Conflict only: retarget to `parent(destination)/name` and re-check.
    RenameTo(String),
    /// Failure only: run the same rename again.
    Retry,
    /// Stop the batch; nothing further is attempted.
    Abort,
}

/// Context handed to a provider.
#[derive(Debug)]
pub enum DecisionPoint<'a> {
    /// An entry already exists at `destination`.
    Conflict {
        source: &'a Path,
        destination: &'a Path,
    },
    /// The rename itself failed. `attempt` counts tries so far (1-based).
    Failure {
        source: &'a Path,
        destination: &'a Path,
        error: &'a io::Error,
        attempt: u32,
    },
}

pub trait DecisionProvider {
    /// Choose an action. Errors mean the decision channel itself is gone.
    fn resolve(&mut self, point: &DecisionPoint<'_>) -> Result<Decision, ApplierError>;

    /// Called when the last answer cannot be used at this point.
    fn rejected(&mut self, _reason: &str) {}
}

impl<D: DecisionProvider + ?Sized> DecisionProvider for &mut D {
    fn resolve(&mut self, point: &DecisionPoint<'_>) -> Result<Decision, ApplierError> {
        (**self).resolve(point)
    }

    fn rejected(&mut self, reason: &str) {
        (**self).rejected(reason)
    }
}

impl<D: DecisionProvider + ?Sized> DecisionProvider for Box<D> {
    fn resolve(&mut self, point: &DecisionPoint<'_>) -> Result<Decision, ApplierError> {
        (**self).resolve(point)
    }

    fn rejected(&mut self, reason: &str) {
        (**self).rejected(reason)
    }
}

/// Unattended, deterministic decisions.
#[derive(Debug, Clone, Copy)]
pub struct PolicyDecider {
    on_conflict: ConflictPolicy,
    on_failure: FailurePolicy,
    retries: u32,
}

impl PolicyDecider {
    /// `retries` is how many extra attempts a failing rename gets before
    /// `on_failure` applies.
    pub fn new(on_conflict: ConflictPolicy, on_failure: FailurePolicy, retries: u32) -> Self {
        Self {
            on_conflict,
            on_failure,
            retries,
        }
    }
}

impl DecisionProvider for PolicyDecider {
    fn resolve(&mut self, point: &DecisionPoint<'_>) -> Result<Decision, ApplierError> {
        Ok(match point {
            DecisionPoint::Conflict { destination, .. } => match self.on_conflict {
                ConflictPolicy::Skip => Decision::Skip,
                ConflictPolicy::Abort => Decision::Abort,
                ConflictPolicy::Suffix => match suffixed_name(destination) {
                    Some(name) => Decision::RenameTo(name),
                    None => Decision::Skip,
                },
            },
            DecisionPoint::Failure { attempt, .. } if *attempt <= self.retries => Decision::Retry,
            DecisionPoint::Failure { .. } => match self.on_failure {
                FailurePolicy::Skip => Decision::Skip,
                FailurePolicy::Abort => Decision::Abort,
            },
        })
    }
}

/// Replays a fixed sequence of answers; `Skip` once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    answers: VecDeque<Decision>,
    asked: usize,
    rejections: Vec<String>,
}

impl ScriptedDecider {
    pub fn new(answers: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Number of decision points seen.
    pub fn asked(&self) -> usize {
        self.asked
    }

    /// Answers left unused.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub fn rejections(&self) -> &[String] {
        &self.rejections
    }
}

impl DecisionProvider for ScriptedDecider {
    fn resolve(&mut self, _point: &DecisionPoint<'_>) -> Result<Decision, ApplierError> {
        self.asked += 1;
        Ok(self.answers.pop_front().unwrap_or(Decision::Skip))
    }

    fn rejected(&mut self, reason: &str) {
        self.rejections.push(reason.to_string());
    }
}

/// Check that `name` is a single path component usable as a new file name.
pub fn validate_file_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }
    if name == "." || name == ".." {
        return Err(format!("'{name}' is not a valid name"));
    }
    if name.len() > 255 {
        return Err("Name is too long (max 255 bytes)".into());
    }
    for c in ['/', '\0'] {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c.escape_default()));
        }
    }

    #[cfg(windows)]
    {
        for c in ['\\', ':', '*', '?', '"', '<', '>', '|'] {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{c}'"));
            }
        }
        let stem = name.split('.').next().unwrap_or(name).to_ascii_uppercase();
        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        if reserved.contains(&stem.as_str()) {
            return Err(format!("'{name}' is a reserved name"));
        }
    }

    Ok(())
}
