//! Platform-specific helpers.
//! Hides Unix/Windows differences (file modes, directory fsync) behind a
//! uniform API so the rest of the codebase stays platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{create_script_file, fsync_dir, open_log_file_secure_append};

#[cfg(not(unix))]
pub use windows::{create_script_file, fsync_dir, open_log_file_secure_append};
