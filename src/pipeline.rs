//! The end-to-end badge update: measure, filter, classify, patch, publish.

use std::fmt::Write;
use std::path::Path;

use log::{info, warn};
use regex::Regex;
use serde::Serialize;

use crate::badge::{badge_url, render_markdown};
use crate::config::BadgeConfig;
use crate::error::{CovshieldError, Result};
use crate::ignore::IgnorePatternSet;
use crate::measure::{self, CoverageTool};
use crate::model::{BadgeSpec, CoverageSummary, CoverageTable};
use crate::parsers::text::TextReportParser;
use crate::parsers::ReportParser;
use crate::patch::{self, PatchOutcome};
use crate::publish::{self, VersionControl};

/// Where the coverage table comes from.
pub enum ReportSource<'a> {
    /// Run the tool in the project directory.
    Tool(&'a dyn CoverageTool),
    /// Parse a report saved by an earlier run.
    Saved(&'a Path),
}

impl ReportSource<'_> {
    fn load(&self, config: &BadgeConfig, ignore: &IgnorePatternSet) -> Result<CoverageTable> {
        match self {
            ReportSource::Tool(tool) => measure::measure(*tool, config.directory(), ignore),
            ReportSource::Saved(path) => {
                let text = std::fs::read_to_string(path)?;
                Ok(ignore.filter(TextReportParser.parse(&text)))
            }
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// File rows that counted towards the total.
    pub files: usize,
    pub summary: CoverageSummary,
    pub badge: BadgeSpec,
    pub url: String,
    pub line: String,
    pub patch: PatchOutcome,
    pub dry_run: bool,
    pub published: bool,
}

impl RunOutcome {
    pub fn format_text(&self) -> String {
        let mut out = String::new();
        if self.summary.is_failed() {
            writeln!(out, "Coverage:   failing").unwrap();
        } else {
            writeln!(
                out,
                "Coverage:   {}% across {} files",
                self.badge.value, self.files
            )
            .unwrap();
        }
        writeln!(out, "Color:      {}", self.badge.color).unwrap();
        writeln!(out, "Badge:      {}", self.url).unwrap();
        let patch = match self.patch {
            PatchOutcome::Replaced(1) => "replaced badge line".to_string(),
            PatchOutcome::Replaced(n) => format!("replaced {n} badge lines"),
            PatchOutcome::Inserted => "inserted badge line".to_string(),
            PatchOutcome::UpToDate => "already up to date".to_string(),
            PatchOutcome::MarkerAbsent => "no badge line found".to_string(),
        };
        if self.dry_run {
            writeln!(out, "File:       {patch} (dry run, not written)").unwrap();
            writeln!(out, "{}", self.line).unwrap();
        } else {
            writeln!(out, "File:       {patch}").unwrap();
        }
        if self.published {
            writeln!(out, "Published:  yes").unwrap();
        }
        out
    }

    pub fn format_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Run the whole pipeline for `config`.
///
/// Measurement problems end up as a failing badge; a missing or unwritable
/// target file, a bad ignore pattern, a marker that would not find the badge
/// again and version-control errors abort.
pub fn run(
    config: &BadgeConfig,
    source: &ReportSource<'_>,
    vcs: &dyn VersionControl,
) -> Result<RunOutcome> {
    let marker = Regex::new(&config.marker)?;
    let ignore = IgnorePatternSet::load(&config.ignore_path())?;
    if !ignore.is_empty() {
        info!("ignoring paths matching {:?}", ignore.patterns());
    }

    let table = source.load(config, &ignore)?;
    let (summary, badge) = config.classifier.classify(&table);
    if summary.is_failed() {
        warn!("no usable coverage data; writing a failing badge");
    }

    let url = badge_url(&badge);
    let line = render_markdown(&badge);
    if !patch::marker_covers(&marker, &line) {
        return Err(CovshieldError::Config(format!(
            "marker pattern `{}` does not match the whole badge line `{line}`",
            config.marker
        )));
    }
    let readme = config.readme_path();

    let patch = if config.dry_run {
        let content = patch::read_target(&readme)?;
        patch::patch_content(&content, &marker, &line, config.insert_if_absent).1
    } else {
        patch::patch(&readme, &marker, &line, config.insert_if_absent)?
    };

    let published = if config.publish && !config.dry_run {
        publish::publish(vcs, &config.readme)?
    } else {
        false
    };

    Ok(RunOutcome {
        files: table.len(),
        summary,
        badge,
        url,
        line,
        patch,
        dry_run: config.dry_run,
        published,
    })
}
