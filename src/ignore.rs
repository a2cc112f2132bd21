//! Ignore patterns, read from a `.gitignore`-style side file.
//!
//! Each non-blank, non-comment line is a regular expression. A row is
//! dropped when its path contains a match for any of them.

use std::path::Path;

use log::debug;
use regex::RegexSet;

use crate::error::Result;
use crate::model::CoverageTable;

/// Default name of the pattern file, relative to the project directory.
pub const DEFAULT_IGNORE_FILE: &str = ".covignore";

#[derive(Debug, Clone)]
pub struct IgnorePatternSet {
    patterns: Vec<String>,
    set: RegexSet,
}

impl Default for IgnorePatternSet {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }
}

impl IgnorePatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let set = RegexSet::new(&patterns)?;
        Ok(Self { patterns, set })
    }

    /// Parse pattern file contents. `#` comments and blank lines are skipped.
    pub fn parse(content: &str) -> Result<Self> {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    /// Load patterns from `path`. A missing file means no patterns.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!("no ignore file at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    /// Drop every row whose path matches a pattern. With no patterns the
    /// table is returned untouched.
    #[must_use]
    pub fn filter(&self, table: CoverageTable) -> CoverageTable {
        if self.is_empty() {
            return table;
        }
        let before = table.len();
        let rows: Vec<_> = table
            .rows
            .into_iter()
            .filter(|row| !self.is_ignored(&row.path))
            .collect();
        debug!("ignore patterns dropped {} of {} rows", before - rows.len(), before);
        CoverageTable { rows }
    }
}
