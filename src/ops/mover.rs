//! The rename primitive the engine drives.

use std::fs;
use std::io;
use std::path::Path;

/// Filesystem seam for the engine.
pub trait Mover {
    /// True when something (file, directory, dangling symlink) sits at `path`.
    /// Lookup errors other than "not found" count as occupied.
    fn occupied(&self, path: &Path) -> bool {
        match fs::symlink_metadata(path) {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl<M: Mover + ?Sized> Mover for &M {
    fn occupied(&self, path: &Path) -> bool {
        (**self).occupied(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }
}

/// Host rename via `std::fs::rename`.
///
/// On Unix the destination directory is fsynced afterwards (best-effort) so
/// the new name survives a crash.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl Mover for FsMover {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)?;

        #[cfg(unix)]
        if let Some(parent) = to.parent() {
            // A failed fsync must not turn a completed rename into a failure.
            let _ = crate::platform::fsync_dir(parent);
        }

        Ok(())
    }
}
