//! Command-line options and the command handler for the covshield CLI.
//!
//! `cmd_update` returns its output as a `String`, making it easy to test
//! without capturing stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::badge::{Classifier, ColorPolicy, PalettePolicy, ThresholdPolicy, DEFAULT_MARKER_PATTERN};
use crate::config::BadgeConfig;
use crate::ignore::DEFAULT_IGNORE_FILE;
use crate::measure::{PythonCoverage, Tester};
use crate::pipeline::{self, ReportSource};
use crate::publish::{Git, VersionControl};

/// Output style for the run summary.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Style {
    #[default]
    Text,
    Json,
}

/// How the badge color is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Smooth red-yellow-green palette.
    #[default]
    Palette,
    /// Poor / medium / good buckets.
    Thresholds,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Project directory to run in.
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// File to put the badge in, relative to the directory.
    #[arg(short, long, default_value = "README.md")]
    pub readme: PathBuf,

    /// Stage, commit and push the updated file with git.
    #[arg(long)]
    pub git_push: bool,

    /// Test runner used under coverage.
    #[arg(long, value_enum, default_value_t = Tester::Unittest)]
    pub tester: Tester,

    /// Python interpreter that has the `coverage` module installed.
    #[arg(long, default_value = "python3")]
    pub python: PathBuf,

    /// Parse a saved `coverage report` output instead of running the tests.
    #[arg(long, value_name = "FILE")]
    pub from_report: Option<PathBuf>,

    /// Ignore-pattern file, relative to the directory.
    #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
    pub ignore_file: PathBuf,

    /// Color policy.
    #[arg(long, value_enum, default_value_t = Policy::Palette)]
    pub policy: Policy,

    /// Number of palette swatches.
    #[arg(long, default_value_t = 100)]
    pub swatches: usize,

    /// Coverage below this is poor (thresholds policy).
    #[arg(long, default_value_t = 25.0)]
    pub poor_max: f64,

    /// Coverage below this, and not poor, is medium (thresholds policy).
    #[arg(long, default_value_t = 75.0)]
    pub medium_max: f64,

    #[arg(long, default_value = "red")]
    pub poor_color: String,

    #[arg(long, default_value = "orange")]
    pub medium_color: String,

    #[arg(long, default_value = "green")]
    pub good_color: String,

    /// Color of the badge when coverage could not be measured.
    #[arg(long, default_value = "red")]
    pub failing_color: String,

    /// Regular expression identifying the badge line. It must match the
    /// rendered badge markdown as a whole.
    #[arg(long, default_value = DEFAULT_MARKER_PATTERN)]
    pub marker: String,

    /// Do not add a badge line when the file has none.
    #[arg(long)]
    pub no_insert: bool,

    /// Show what would change without writing or publishing.
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for UpdateArgs {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            readme: PathBuf::from("README.md"),
            git_push: false,
            tester: Tester::Unittest,
            python: PathBuf::from("python3"),
            from_report: None,
            ignore_file: PathBuf::from(DEFAULT_IGNORE_FILE),
            policy: Policy::Palette,
            swatches: 100,
            poor_max: 25.0,
            medium_max: 75.0,
            poor_color: "red".to_string(),
            medium_color: "orange".to_string(),
            good_color: "green".to_string(),
            failing_color: "red".to_string(),
            marker: DEFAULT_MARKER_PATTERN.to_string(),
            no_insert: false,
            dry_run: false,
        }
    }
}

impl UpdateArgs {
    /// Validate the flags and fold them into a [`BadgeConfig`].
    pub fn to_config(&self) -> Result<BadgeConfig> {
        let policy = match self.policy {
            Policy::Palette => ColorPolicy::Palette(PalettePolicy::new(self.swatches)?),
            Policy::Thresholds => ColorPolicy::Thresholds(
                ThresholdPolicy::new(self.poor_max, self.medium_max)?.with_colors(
                    &self.poor_color,
                    &self.medium_color,
                    &self.good_color,
                ),
            ),
        };

        Ok(BadgeConfig {
            directory: self.directory.clone(),
            readme: self.readme.clone(),
            ignore_file: self.ignore_file.clone(),
            classifier: Classifier::new(policy).with_failing_color(&self.failing_color),
            marker: self.marker.clone(),
            insert_if_absent: !self.no_insert,
            publish: self.git_push,
            dry_run: self.dry_run,
        })
    }

    pub fn coverage_tool(&self) -> PythonCoverage {
        PythonCoverage {
            python: self.python.clone(),
            tester: self.tester,
        }
    }
}

/// Measure (or read a saved report), update the badge and optionally publish.
pub fn cmd_update(args: &UpdateArgs, style: Style) -> Result<String> {
    let config = args.to_config()?;
    let tool = args.coverage_tool();
    let git = Git::new(&args.directory);
    let source = match &args.from_report {
        Some(path) => ReportSource::Saved(path),
        None => ReportSource::Tool(&tool),
    };
    cmd_update_with(&config, &source, &git, style)
}

/// Core of `cmd_update` with the collaborators supplied by the caller.
pub fn cmd_update_with(
    config: &BadgeConfig,
    source: &ReportSource<'_>,
    vcs: &dyn VersionControl,
    style: Style,
) -> Result<String> {
    let outcome = pipeline::run(config, source, vcs)
        .with_context(|| format!("Failed to update badge in {}", config.readme_path().display()))?;

    let output = match style {
        Style::Text => outcome.format_text(),
        Style::Json => outcome.format_json()?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::error::Result as CovResult;

    struct NoVcs;

    impl VersionControl for NoVcs {
        fn has_changes(&self, _path: &Path) -> CovResult<bool> {
            Ok(false)
        }
        fn stage(&self, _path: &Path) -> CovResult<()> {
            unreachable!()
        }
        fn commit(&self, _message: &str) -> CovResult<()> {
            unreachable!()
        }
        fn push(&self) -> CovResult<()> {
            unreachable!()
        }
    }

    const REPORT: &str = "\
Name        Stmts   Miss  Cover
-------------------------------
pkg/a.py       10      2    80%
-------------------------------
TOTAL          10      2    80%
";

    /// A project directory holding a README and a saved report.
    fn seed_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# Demo\n\nText.\n").unwrap();
        std::fs::write(dir.path().join("report.txt"), REPORT).unwrap();
        dir
    }

    fn args_for(dir: &Path) -> UpdateArgs {
        UpdateArgs {
            directory: dir.to_path_buf(),
            from_report: Some(dir.join("report.txt")),
            ..UpdateArgs::default()
        }
    }

    #[test]
    fn test_to_config_palette() {
        let config = UpdateArgs::default().to_config().unwrap();
        assert!(matches!(config.classifier.policy, ColorPolicy::Palette(_)));
        assert_eq!(config.classifier.failing_color, "red");
        assert!(config.insert_if_absent);
    }

    #[test]
    fn test_to_config_thresholds() {
        let args = UpdateArgs {
            policy: Policy::Thresholds,
            poor_max: 50.0,
            medium_max: 90.0,
            good_color: "brightgreen".to_string(),
            no_insert: true,
            git_push: true,
            ..UpdateArgs::default()
        };
        let config = args.to_config().unwrap();
        match &config.classifier.policy {
            ColorPolicy::Thresholds(t) => {
                assert_eq!(t.poor_max, 50.0);
                assert_eq!(t.medium_max, 90.0);
                assert_eq!(t.good_color, "brightgreen");
            }
            other => panic!("unexpected policy {other:?}"),
        }
        assert!(!config.insert_if_absent);
        assert!(config.publish);
    }

    #[test]
    fn test_to_config_rejects_bad_thresholds() {
        let args = UpdateArgs {
            policy: Policy::Thresholds,
            poor_max: 80.0,
            medium_max: 20.0,
            ..UpdateArgs::default()
        };
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_to_config_rejects_zero_swatches() {
        let args = UpdateArgs {
            swatches: 0,
            ..UpdateArgs::default()
        };
        assert!(args.to_config().is_err());
    }

    #[test]
    fn test_cmd_update_from_saved_report() {
        let dir = seed_project();
        let args = UpdateArgs {
            policy: Policy::Thresholds,
            ..args_for(dir.path())
        };

        let out = cmd_update(&args, Style::Text).unwrap();

        assert!(out.contains("80.0%"));
        assert!(out.contains("inserted badge line"));
        let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(readme.starts_with(
            "![Code Coverage](https://img.shields.io/badge/coverage-80.0%25-green)\n"
        ));
    }

    #[test]
    fn test_cmd_update_dry_run_leaves_file() {
        let dir = seed_project();
        let args = UpdateArgs {
            dry_run: true,
            ..args_for(dir.path())
        };

        let out = cmd_update(&args, Style::Text).unwrap();

        assert!(out.contains("dry run"));
        assert!(out.contains("![Code Coverage]("));
        let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert_eq!(readme, "# Demo\n\nText.\n");
    }

    #[test]
    fn test_cmd_update_json() {
        let dir = seed_project();
        let config = args_for(dir.path()).to_config().unwrap();
        let report = dir.path().join("report.txt");

        let out = cmd_update_with(&config, &ReportSource::Saved(&report), &NoVcs, Style::Json)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["badge"]["value"], "80.0");
        assert_eq!(value["files"], 1);
        assert_eq!(value["published"], false);
    }

    #[test]
    fn test_cmd_update_missing_readme() {
        let dir = seed_project();
        let args = UpdateArgs {
            readme: PathBuf::from("docs/INDEX.md"),
            ..args_for(dir.path())
        };

        let err = cmd_update(&args, Style::Text).unwrap_err();
        assert!(format!("{err:#}").contains("Target file not found"));
    }
}
