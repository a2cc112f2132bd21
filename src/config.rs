//! Settings for one badge update, resolved against the project directory.

use std::path::{Path, PathBuf};

use crate::badge::{Classifier, DEFAULT_MARKER_PATTERN};
use crate::ignore::DEFAULT_IGNORE_FILE;

#[derive(Debug, Clone)]
pub struct BadgeConfig {
    /// Project root. Child processes run here; relative paths below resolve
    /// against it.
    pub directory: PathBuf,
    /// File receiving the badge, relative to `directory`.
    pub readme: PathBuf,
    /// Ignore-pattern file, relative to `directory`.
    pub ignore_file: PathBuf,
    pub classifier: Classifier,
    /// Regular expression identifying the badge line.
    pub marker: String,
    pub insert_if_absent: bool,
    pub publish: bool,
    /// Compute everything but leave the file and repository alone.
    pub dry_run: bool,
}

impl BadgeConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn readme_path(&self) -> PathBuf {
        self.directory.join(&self.readme)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.directory.join(&self.ignore_file)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            readme: PathBuf::from("README.md"),
            ignore_file: PathBuf::from(DEFAULT_IGNORE_FILE),
            classifier: Classifier::default(),
            marker: DEFAULT_MARKER_PATTERN.to_string(),
            insert_if_absent: true,
            publish: false,
            dry_run: false,
        }
    }
}
