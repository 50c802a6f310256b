//! Config validation.
//! The only filesystem requirement is a usable script directory: it is
//! created if missing and must accept new files, so the revert script can
//! always be written after renames have happened.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::ops::io_error_with_help;
use crate::utils::is_writable_probe;

use super::types::Config;

impl Config {
    /// Validate the script directory before any rename is attempted.
    pub fn validate(&self) -> Result<()> {
        let dir = &self.script_dir;
        ensure_dir_is_or_create(dir, "script_dir")?;
        ensure_writable(dir, "script_dir")?;

        info!(
            "Config validated: script_dir='{}' log_file='{}' dry_run={} non_interactive={}",
            dir.display(),
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into()),
            self.dry_run,
            self.non_interactive
        );
        Ok(())
    }
}

/// Ensure directory exists (create if missing). If it exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("{name} exists but isn't a directory: {}", path.display());
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path).map_err(io_error_with_help("create script directory", path))?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    is_writable_probe(path).with_context(|| {
        format!("Cannot write to {name} '{}'; check permissions", path.display())
    })?;
    debug!("{name} writable: {}", path.display());
    Ok(())
}
