//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel and the unattended policies parse from config/CLI strings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default); progress still prints to stdout
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Unattended answer to an occupied destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    #[default]
    Skip,
    /// Rename to the first free "name (n).ext".
    Suffix,
    Abort,
}

impl FromStr for ConflictPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(ConflictPolicy::Skip),
            "suffix" | "rename" => Ok(ConflictPolicy::Suffix),
            "abort" => Ok(ConflictPolicy::Abort),
            _ => Err(format!("invalid conflict policy: '{s}' (expected skip, suffix or abort)")),
        }
    }
}

/// Unattended answer to a rename that keeps failing after its retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Skip,
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(FailurePolicy::Skip),
            "abort" => Ok(FailurePolicy::Abort),
            _ => Err(format!("invalid failure policy: '{s}' (expected skip or abort)")),
        }
    }
}

/// Runtime configuration used by the applier.
#[derive(Debug, Clone)]
pub struct Config {
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Where changelog/revert scripts are written
    pub script_dir: PathBuf,
    /// If true, print the plan and write scripts but rename nothing
    pub dry_run: bool,
    /// If true, decide conflicts/failures by policy instead of prompting
    pub non_interactive: bool,
    pub on_conflict: ConflictPolicy,
    pub on_failure: FailurePolicy,
    /// Extra attempts for a failing rename in non-interactive mode
    pub retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
            log_file: None,
            script_dir: PathBuf::from("."),
            dry_run: false,
            non_interactive: false,
            on_conflict: ConflictPolicy::Skip,
            on_failure: FailurePolicy::Skip,
            retries: 0,
        }
    }
}
