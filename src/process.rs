//! Thin wrappers around `std::process::Command` shared by the coverage tool
//! and git clients.

use std::process::{Command, Output};

use crate::error::{CovshieldError, Result};

/// Render a command for log and error messages, e.g. `git add README.md`.
pub fn display(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run to completion, capturing output. Only failing to spawn is an error;
/// the exit status is left to the caller.
pub fn output(cmd: &mut Command) -> Result<Output> {
    cmd.output().map_err(|e| {
        CovshieldError::Other(format!("Failed to run `{}`: {e}", display(cmd)))
    })
}

/// Run to completion and return stdout, failing on a non-zero exit.
pub fn checked(cmd: &mut Command) -> Result<String> {
    let out = output(cmd)?;
    if !out.status.success() {
        return Err(CovshieldError::Process {
            command: display(cmd),
            code: out.status.code(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}
