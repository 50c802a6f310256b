//! Changelog and revert script generation.
//!
//! Both scripts are built only from applied outcomes and use each outcome's
//! final destination, so the revert script undoes what actually happened
//! (including conflict renames), in reverse order.
//!
//! Files are named `<YYYYmmdd-HHMMSS>_<label>.<ext>` and created with
//! create-new semantics; a taken name gets `-2`, `-3`, ... appended, so an
//! earlier run's scripts are never overwritten.

use chrono::{DateTime, TimeZone};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::{CHANGELOG_LABEL, REVERT_LABEL};
use crate::errors::ApplierError;
use crate::ops::Outcome;
use crate::platform::create_script_file;

const MAX_NAME_TRIES: u32 = 1000;

/// Script dialect of the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// bash, `mv`
    Posix,
    /// cmd.exe, `move`
    Cmd,
}

impl Shell {
    pub fn host() -> Self {
        if cfg!(windows) { Shell::Cmd } else { Shell::Posix }
    }

    pub fn header(self) -> &'static str {
        match self {
            Shell::Posix => "#!/bin/bash",
            Shell::Cmd => "@echo off",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Shell::Posix => "sh",
            Shell::Cmd => "cmd",
        }
    }

    /// One move command, arguments quoted for this shell.
    pub fn move_command(self, from: &Path, to: &Path) -> String {
        match self {
            Shell::Posix => format!("mv -- {} {}", quote_posix(from), quote_posix(to)),
            Shell::Cmd => format!("move {} {}", quote_cmd(from), quote_cmd(to)),
        }
    }
}

fn path_text(p: &Path) -> std::borrow::Cow<'_, str> {
    let s = p.to_string_lossy();
    if let std::borrow::Cow::Owned(_) = s {
        warn!(path = %p.display(), "path is not valid UTF-8; script line will not match it exactly");
    }
    s
}

/// Single-quote for bash; embedded `'` becomes `'\''`.
fn quote_posix(p: &Path) -> String {
    format!("'{}'", path_text(p).replace('\'', r"'\''"))
}

/// Double-quote for cmd.exe; `%` is doubled so it is not expanded in a batch file.
fn quote_cmd(p: &Path) -> String {
    format!("\"{}\"", path_text(p).replace('%', "%%"))
}

/// Forward script: applied order, source -> final destination.
pub fn render_changelog(shell: Shell, applied: &[&Outcome]) -> String {
    let mut script = String::new();
    let _ = writeln!(script, "{}", shell.header());
    for o in applied {
        let _ = writeln!(script, "{}", shell.move_command(o.source(), &o.destination));
    }
    script
}

/// Reverse script: reverse order, final destination -> source.
pub fn render_revert(shell: Shell, applied: &[&Outcome]) -> String {
    let mut script = String::new();
    let _ = writeln!(script, "{}", shell.header());
    for o in applied.iter().rev() {
        let _ = writeln!(script, "{}", shell.move_command(&o.destination, o.source()));
    }
    script
}

/// Paths of the two scripts written for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPair {
    pub changelog: PathBuf,
    pub revert: PathBuf,
}

/// Write both scripts into `dir`, stamped with `stamp`.
///
/// The revert script is written first: if anything fails afterwards, the
/// undo path already exists on disk.
pub fn write_scripts<Tz: TimeZone>(
    dir: &Path,
    applied: &[&Outcome],
    shell: Shell,
    stamp: &DateTime<Tz>,
) -> Result<ScriptPair, ApplierError>
where
    Tz::Offset: std::fmt::Display,
{
    let prefix = stamp.format("%Y%m%d-%H%M%S").to_string();
    let revert = write_new_script(dir, &prefix, REVERT_LABEL, shell, &render_revert(shell, applied))?;
    let changelog = write_new_script(
        dir,
        &prefix,
        CHANGELOG_LABEL,
        shell,
        &render_changelog(shell, applied),
    )?;
    Ok(ScriptPair { changelog, revert })
}

fn write_new_script(
    dir: &Path,
    prefix: &str,
    label: &'static str,
    shell: Shell,
    body: &str,
) -> Result<PathBuf, ApplierError> {
    let fail = |path: &Path, source: io::Error| ApplierError::ScriptWrite {
        label,
        path: path.to_path_buf(),
        source,
    };

    let mut n = 1u32;
    loop {
        let name = if n == 1 {
            format!("{prefix}_{label}.{}", shell.extension())
        } else {
            format!("{prefix}_{label}-{n}.{}", shell.extension())
        };
        let path = dir.join(name);
        match create_script_file(&path) {
            Ok(mut f) => {
                f.write_all(body.as_bytes()).map_err(|e| fail(&path, e))?;
                f.sync_all().map_err(|e| fail(&path, e))?;
                debug!(script = %path.display(), bytes = body.len(), "script written");
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && n < MAX_NAME_TRIES => n += 1,
            Err(e) => return Err(fail(&path, e)),
        }
    }
}
