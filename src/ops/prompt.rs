//! Interactive, line-oriented decisions.
//!
//! One line is read per answer. Action letters are trimmed and matched
//! case-insensitively; rename names are only trimmed. Unknown answers redisplay
//! the prompt. End of input is reported as `ApplierError::PromptClosed`.
//! Once a shutdown has been requested any answer, even an empty or invalid
//! one, returns `Skip` so the engine can stop.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::errors::ApplierError;
use crate::shutdown;

use super::decide::{Decision, DecisionPoint, DecisionProvider, validate_file_name};

pub struct PromptDecider<R, W> {
    input: R,
    output: W,
}

impl PromptDecider<StdinLock<'static>, Stdout> {
    /// Prompt on stdout, read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer (tests inspect what was shown).
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String, ApplierError> {
        write!(self.output, "{prompt}").map_err(ApplierError::PromptIo)?;
        self.output.flush().map_err(ApplierError::PromptIo)?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .map_err(ApplierError::PromptIo)?;
        if n == 0 {
            return Err(ApplierError::PromptClosed);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, msg: &str) {
        let _ = writeln!(self.output, "    -> {msg}");
    }

    fn ask_new_name(&mut self) -> Result<String, ApplierError> {
        loop {
            let name = self.ask("    -> Enter new name: ")?;
            // The engine drops the answer once it sees the stop flag.
            if shutdown::is_requested() {
                return Ok(name);
            }
            match validate_file_name(&name) {
                Ok(()) => return Ok(name),
                Err(reason) => self.say(&reason),
            }
        }
    }
}

impl<R: BufRead, W: Write> DecisionProvider for PromptDecider<R, W> {
    fn resolve(&mut self, point: &DecisionPoint<'_>) -> Result<Decision, ApplierError> {
        match point {
            DecisionPoint::Conflict { .. } => loop {
                let answer = self
                    .ask("  - Choose an action: [S]kip (default), [R]ename, [A]bort all: ")?
                    .to_ascii_uppercase();
                if shutdown::is_requested() {
                    return Ok(Decision::Skip);
                }
                match answer.as_str() {
                    "" | "S" => return Ok(Decision::Skip),
                    "R" => return self.ask_new_name().map(Decision::RenameTo),
                    "A" => return Ok(Decision::Abort),
                    _ => self.say("Invalid option."),
                }
            },
            DecisionPoint::Failure { .. } => loop {
                let answer = self
                    .ask("  - Choose an action: [R]etry, [S]kip, [A]bort all: ")?
                    .to_ascii_uppercase();
                if shutdown::is_requested() {
                    return Ok(Decision::Skip);
                }
                match answer.as_str() {
                    "R" => return Ok(Decision::Retry),
                    "S" => return Ok(Decision::Skip),
                    "A" => return Ok(Decision::Abort),
                    _ => self.say("Invalid option."),
                }
            },
        }
    }

    fn rejected(&mut self, reason: &str) {
        self.say(reason);
    }
}
