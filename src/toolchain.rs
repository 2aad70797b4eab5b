//! src/toolchain.rs
// Describes the linter the generated hook will call.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

pub const DEFAULT_LINTER: &str = "pylint";

/// A linter invocation, rendered verbatim into the hook script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterCommand {
    program: String,
    args: Vec<String>,
}

impl LinterCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        LinterCommand {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the program can be found on `PATH` right now.
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }
}

impl Default for LinterCommand {
    fn default() -> Self {
        LinterCommand::new(DEFAULT_LINTER, &[])
    }
}

impl FromStr for LinterCommand {
    type Err = anyhow::Error;

    fn from_str(command_str: &str) -> Result<Self> {
        let parts: Vec<&str> = command_str.split_whitespace().collect();
        let Some(program) = parts.first() else {
            return Err(anyhow!("Linter command must not be empty"));
        };
        Ok(LinterCommand::new(program, &parts[1..]))
    }
}

impl fmt::Display for LinterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.program)
        } else {
            write!(f, "{} {}", self.program, self.args.join(" "))
        }
    }
}
