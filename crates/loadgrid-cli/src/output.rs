//! Output format selection and exit codes
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success |
//! | 1 | Failure: `check` found errors, or loading failed |
//! | 2 | Usage error (reported by clap) |

use std::process;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
}

impl ExitCode {
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

/// Print either the text rendering or the JSON form of `value`
pub fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_from_errors() {
        assert_eq!(ExitCode::from_error_count(0), ExitCode::Success);
        assert_eq!(ExitCode::from_error_count(3), ExitCode::Failure);
        assert_eq!(ExitCode::Failure as u8, 1);
    }
}
