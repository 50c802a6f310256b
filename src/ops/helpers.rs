//! I/O error messages with actionable hints.
//!
//! Used for per-operation failure reports and, through `io_error_with_help`,
//! in anyhow code paths:
//!
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// "<op> '<path>': <error> — <hint> [os code: N]"
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        if let Some(hint) = os_hint(code) {
            msg.push_str(" — ");
            msg.push_str(hint);
        }
        msg.push_str(&format!(" [os code: {code}]"));
    } else if let Some(hint) = kind_hint(e.kind()) {
        msg.push_str(" — ");
        msg.push_str(hint);
    }

    msg
}

#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    Some(match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions.",
        libc::EXDEV => "cross-filesystem; rename cannot move between devices.",
        libc::EBUSY => "resource busy; ensure no other process is using it.",
        libc::ENOENT => "path not found; it may have been moved or deleted.",
        libc::EEXIST | libc::ENOTEMPTY => "destination exists; pick a different name.",
        libc::ENOTDIR => "a parent component is not a directory.",
        libc::EISDIR => "cannot replace a directory with a file.",
        libc::EINVAL => "cannot move a directory inside itself.",
        libc::ENOSPC => "insufficient space on device.",
        libc::EROFS => "read-only filesystem; cannot write here.",
        libc::ELOOP => "too many symbolic link levels (ELOOP); possible symlink cycle.",
        libc::ENAMETOOLONG => "filename or path too long; shorten path segments.",
        _ => return None,
    })
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    use windows_sys::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_DISK_FULL, ERROR_FILE_EXISTS,
        ERROR_FILE_NOT_FOUND, ERROR_FILENAME_EXCED_RANGE, ERROR_NOT_SAME_DEVICE,
        ERROR_PATH_NOT_FOUND, ERROR_SHARING_VIOLATION, ERROR_WRITE_PROTECT,
    };
    Some(match code as u32 {
        ERROR_ACCESS_DENIED => "access denied; check permissions.",
        ERROR_NOT_SAME_DEVICE => "not same device; cross-filesystem move.",
        ERROR_SHARING_VIOLATION => "sharing violation; file is in use.",
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => {
            "path not found; it may have been moved or deleted."
        }
        ERROR_FILE_EXISTS | ERROR_ALREADY_EXISTS => "destination exists; pick a different name.",
        ERROR_DISK_FULL => "insufficient disk space.",
        ERROR_WRITE_PROTECT => "write protected / read-only media.",
        ERROR_FILENAME_EXCED_RANGE => "filename or path too long (MAX_PATH exceeded).",
        _ => return None,
    })
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    Some(match kind {
        io::ErrorKind::PermissionDenied => {
            "permission denied; check ownership and write permissions."
        }
        io::ErrorKind::NotFound => "path not found; it may have been moved or deleted.",
        io::ErrorKind::AlreadyExists => "destination exists; pick a different name.",
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => "busy/timed out; retry shortly.",
        _ => return None,
    })
}

/// Adapter for anyhow::Result code: `.map_err(io_error_with_help(op, path))`.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(describe_io_error(op, path, &e))
}
