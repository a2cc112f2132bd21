#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use covshield::error::{CovshieldError, Result};
use covshield::measure::{CoverageTool, RunOutput};
use covshield::publish::VersionControl;
use tempfile::TempDir;

/// Create a temporary project directory containing `README.md` with the
/// given content. The caller must hold onto `TempDir` to keep it alive.
pub fn setup_project(readme: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let readme_path = dir.path().join("README.md");
    std::fs::write(&readme_path, readme).unwrap();
    (dir, readme_path)
}

/// Coverage tool returning canned output.
pub struct FakeTool {
    pub exit_code: i32,
    pub report: Option<String>,
    pub runs: RefCell<Vec<PathBuf>>,
}

impl FakeTool {
    pub fn passing(report: &str) -> Self {
        Self {
            exit_code: 0,
            report: Some(report.to_string()),
            runs: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            exit_code: 1,
            report: None,
            runs: RefCell::new(Vec::new()),
        }
    }
}

impl CoverageTool for FakeTool {
    fn run(&self, directory: &Path) -> Result<RunOutput> {
        self.runs.borrow_mut().push(directory.to_path_buf());
        Ok(RunOutput {
            command: "python3 -m coverage run --source=. -m unittest".to_string(),
            success: self.exit_code == 0,
            code: Some(self.exit_code),
            stderr: "FAILED (failures=1)".to_string(),
        })
    }

    fn report(&self, _directory: &Path) -> Result<String> {
        self.report.clone().ok_or_else(|| CovshieldError::Process {
            command: "python3 -m coverage report".to_string(),
            code: Some(1),
            stderr: "No data to report.".to_string(),
        })
    }
}

/// Version-control client that records every call.
#[derive(Default)]
pub struct FakeVcs {
    pub changed: bool,
    pub fail_push: bool,
    pub calls: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn with_changes() -> Self {
        Self {
            changed: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl VersionControl for FakeVcs {
    fn has_changes(&self, path: &Path) -> Result<bool> {
        self.calls.borrow_mut().push(format!("status {}", path.display()));
        Ok(self.changed)
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.calls.borrow_mut().push(format!("add {}", path.display()));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("commit {message}"));
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.calls.borrow_mut().push("push".to_string());
        if self.fail_push {
            return Err(CovshieldError::Process {
                command: "git push".to_string(),
                code: Some(1),
                stderr: "rejected".to_string(),
            });
        }
        Ok(())
    }
}
