//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - `--nerf` is the historical name of the dry-run switch; `--dry-run` is an alias.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, ConflictPolicy, FailurePolicy, LogLevel};

/// Apply a reviewed list of file renames and write changelog/revert scripts.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "filesense-applier",
    author,
    version,
    about = "Apply reviewed file renames; emit changelog and revert scripts"
)]
pub struct Args {
    /// JSON list of change records to apply.
    #[arg(
        value_name = "CHANGES",
        value_hint = ValueHint::FilePath,
        required_unless_present = "print_config"
    )]
    pub changes: Option<PathBuf>,

    /// Dry-run: print the plan and write both scripts, but rename nothing.
    #[arg(long, visible_alias = "dry-run")]
    pub nerf: bool,

    /// Directory for the generated scripts (default: current directory).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub script_dir: Option<PathBuf>,

    /// Never prompt; resolve conflicts and failures by policy.
    #[arg(long)]
    pub non_interactive: bool,

    /// Non-interactive answer to an existing destination: skip, suffix or abort.
    #[arg(long, value_name = "POLICY")]
    pub on_conflict: Option<ConflictPolicy>,

    /// Non-interactive answer to a rename that still fails after retries: skip or abort.
    #[arg(long = "on-error", value_name = "POLICY")]
    pub on_error: Option<FailurePolicy>,

    /// Non-interactive extra attempts for a failing rename.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Also append logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the config file location used and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// The change list path with stray shell quoting removed.
    pub fn resolved_changes(&self) -> Option<PathBuf> {
        self.changes.as_deref().map(Self::sanitize_path)
    }

    #[inline]
    fn sanitize_path(p: &Path) -> PathBuf {
        // PowerShell/CMD users sometimes pass quotes through literally.
        let s = p.to_string_lossy();
        let trimmed = s.trim();
        let inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            &trimmed[1..trimmed.len() - 1]
        } else {
            trimmed
        };
        if inner.len() == s.len() {
            p.to_path_buf()
        } else {
            PathBuf::from(inner)
        }
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
        if let Some(d) = &self.script_dir {
            cfg.script_dir = d.clone();
        }
        if self.nerf {
            cfg.dry_run = true;
        }
        if self.non_interactive {
            cfg.non_interactive = true;
        }
        if let Some(p) = self.on_conflict {
            cfg.on_conflict = p;
        }
        if let Some(p) = self.on_error {
            cfg.on_failure = p;
        }
        if let Some(n) = self.retries {
            cfg.retries = n;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
