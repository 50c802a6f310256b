//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; `.cmd` scripts are runnable by
//!   extension, so no permission change is needed.
//! - Directory fsync is not available through std; it is a no-op here.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Create a new script file; fails with `AlreadyExists` rather than truncating.
pub fn create_script_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// No-op on Windows.
pub fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
