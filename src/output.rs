//! User-facing console lines.
//!
//! Progress, prompts and the final summary go to stdout; warnings and errors to
//! stderr. Tags are colored only when the target stream is a TTY. Diagnostic
//! logging is separate (see `logging`).

use owo_colors::{AnsiColors, OwoColorize};

#[derive(Clone, Copy)]
enum Stream {
    Out,
    Err,
}

fn emit(stream: Stream, tag: &str, color: AnsiColors, msg: &str) {
    let tty = match stream {
        Stream::Out => atty::is(atty::Stream::Stdout),
        Stream::Err => atty::is(atty::Stream::Stderr),
    };
    let line = if tty {
        format!("{} {}", tag.color(color).bold(), msg)
    } else {
        format!("{tag} {msg}")
    };
    match stream {
        Stream::Out => println!("{line}"),
        Stream::Err => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Out, "info:", AnsiColors::Cyan, msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Err, "warn:", AnsiColors::Yellow, msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Err, "error:", AnsiColors::Red, msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Out, "ok:", AnsiColors::Green, msg);
}

/// Plain progress line (no tag), e.g. "Processing: a -> b".
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// End-of-run tally.
pub fn print_summary(applied: usize, skipped: usize, not_attempted: usize) {
    let mut msg = format!("{applied} applied, {skipped} skipped");
    if not_attempted > 0 {
        msg.push_str(&format!(", {not_attempted} not attempted"));
    }
    if skipped == 0 && not_attempted == 0 {
        print_success(&msg);
    } else {
        print_info(&msg);
    }
}
