use std::fs;
use std::io;
use std::path::Path;

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files.
pub(crate) fn is_writable_probe(dir: &Path) -> io::Result<()> {
    let probe = dir.join(format!(".filesense_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)?;
    let _ = fs::remove_file(&probe);
    Ok(())
}
