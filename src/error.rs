use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovshieldError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Target file not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("Command `{command}` failed (exit code {code:?}): {stderr}")]
    Process {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CovshieldError>;
