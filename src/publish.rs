//! Publishing the patched file through version control.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::error::Result;
use crate::process;

/// A version-control client offering the few operations publishing needs.
pub trait VersionControl {
    /// Whether `path` has uncommitted changes.
    fn has_changes(&self, path: &Path) -> Result<bool>;
    fn stage(&self, path: &Path) -> Result<()>;
    fn commit(&self, message: &str) -> Result<()>;
    fn push(&self) -> Result<()>;
}

/// The `git` command line, run inside a repository directory.
#[derive(Debug, Clone)]
pub struct Git {
    directory: PathBuf,
}

impl Git {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.directory);
        cmd
    }
}

impl VersionControl for Git {
    fn has_changes(&self, path: &Path) -> Result<bool> {
        let mut cmd = self.git();
        cmd.args(["status", "--porcelain", "--"]).arg(path);
        let stdout = process::checked(&mut cmd)?;
        Ok(!stdout.trim().is_empty())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["add", "--"]).arg(path);
        process::checked(&mut cmd).map(drop)
    }

    fn commit(&self, message: &str) -> Result<()> {
        let mut cmd = self.git();
        cmd.args(["commit", "-m", message]);
        process::checked(&mut cmd).map(drop)
    }

    fn push(&self) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("push");
        process::checked(&mut cmd).map(drop)
    }
}

pub fn commit_message(path: &Path) -> String {
    format!("Updated coverage badge in {}", path.display())
}

/// Stage, commit and push `path`, in that order. Returns `false` without
/// touching the repository when `path` has nothing to commit. The first
/// failing step aborts the rest.
pub fn publish(vcs: &dyn VersionControl, path: &Path) -> Result<bool> {
    if !vcs.has_changes(path)? {
        info!("{} unchanged, nothing to publish", path.display());
        return Ok(false);
    }
    vcs.stage(path)?;
    vcs.commit(&commit_message(path))?;
    vcs.push()?;
    info!("published {}", path.display());
    Ok(true)
}
