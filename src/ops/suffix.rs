//! Free-name search for unattended conflict renames.
//!
//! "movie.mkv" -> "movie (2).mkv", "movie (3).mkv", ...
//! ".env" -> ".env (2)"
//! "archive.tar.gz" -> "archive.tar (2).gz"

use std::fs;
use std::path::Path;
use tracing::trace;

const MAX_TRIES: u32 = 10_000;

// Conservative filename limits (bytes, platform-specific and approximate).
#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240; // leave headroom for legacy MAX_PATH
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

/// First free sibling name of `dest` of the form "stem (n).ext", n >= 2.
///
/// Returns only the file name. `None` when `dest` has no file name or every
/// candidate up to the limit is taken.
pub fn suffixed_name(dest: &Path) -> Option<String> {
    let file_name = dest.file_name()?.to_string_lossy().into_owned();
    let parent = dest.parent().unwrap_or_else(|| Path::new(""));

    let base = Path::new(&file_name);
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.clone());
    let ext = base.extension().map(|e| e.to_string_lossy().into_owned());

    for n in 2..=MAX_TRIES {
        let name = build_name_with_suffix(&stem, ext.as_deref(), &format!(" ({n})"));
        if !occupied(&parent.join(&name)) {
            return Some(name);
        }
        if n == 4 {
            trace!(name = %file_name, dir = %parent.display(), "suffix: multiple collisions, still searching");
        }
    }
    None
}

fn occupied(p: &Path) -> bool {
    fs::symlink_metadata(p).is_ok()
}

/// Truncate the stem so `stem + suffix + ["." + ext]` fits the filename limit.
fn build_name_with_suffix(stem: &str, ext: Option<&str>, suffix: &str) -> String {
    let ext_part = ext.map(|e| format!(".{e}")).unwrap_or_default();
    let overhead = suffix.len() + ext_part.len();
    let budget = MAX_FILENAME_LEN.saturating_sub(overhead);

    let mut kept = String::new();
    for ch in stem.chars() {
        if kept.len() + ch.len_utf8() > budget {
            break;
        }
        kept.push(ch);
    }
    if kept.is_empty() {
        kept.push('f');
    }
    format!("{kept}{suffix}{ext_part}")
}
