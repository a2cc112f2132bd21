//! Running the coverage tool and turning its output into a filtered table.
//!
//! The tool is a capability ([`CoverageTool`]) so tests can swap in a fake.
//! The real implementation drives Python's `coverage` module in the target
//! directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::ValueEnum;
use log::{error, info, warn};

use crate::error::Result;
use crate::ignore::IgnorePatternSet;
use crate::model::CoverageTable;
use crate::parsers::text::TextReportParser;
use crate::parsers::ReportParser;
use crate::process;

/// Result of the measurement step.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub command: String,
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

/// An external coverage tool.
pub trait CoverageTool {
    /// Run the test suite under coverage in `directory`. A tool that runs but
    /// exits non-zero is reported through `RunOutput::success`; `Err` means it
    /// could not be run at all.
    fn run(&self, directory: &Path) -> Result<RunOutput>;

    /// Render the text report for the last run in `directory`.
    fn report(&self, directory: &Path) -> Result<String>;
}

/// Test runner module handed to `coverage run -m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tester {
    #[default]
    Unittest,
    Pytest,
}

impl Tester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tester::Unittest => "unittest",
            Tester::Pytest => "pytest",
        }
    }
}

impl fmt::Display for Tester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `python -m coverage` driven as a child process.
#[derive(Debug, Clone)]
pub struct PythonCoverage {
    pub python: PathBuf,
    pub tester: Tester,
}

impl Default for PythonCoverage {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python3"),
            tester: Tester::default(),
        }
    }
}

impl PythonCoverage {
    fn command(&self, directory: &Path) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.current_dir(directory).args(["-m", "coverage"]);
        cmd
    }
}

impl CoverageTool for PythonCoverage {
    fn run(&self, directory: &Path) -> Result<RunOutput> {
        let mut cmd = self.command(directory);
        cmd.args(["run", "--source=.", "-m", self.tester.as_str()]);
        let out = process::output(&mut cmd)?;
        Ok(RunOutput {
            command: process::display(&cmd),
            success: out.status.success(),
            code: out.status.code(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn report(&self, directory: &Path) -> Result<String> {
        let mut cmd = self.command(directory);
        cmd.arg("report");
        process::checked(&mut cmd)
    }
}

/// Run the tool, parse its report and drop ignored rows.
///
/// A failing test run or report step is not an error: it yields an empty
/// table, which classifies as a failing badge.
pub fn measure(
    tool: &dyn CoverageTool,
    directory: &Path,
    ignore: &IgnorePatternSet,
) -> Result<CoverageTable> {
    let run = tool.run(directory)?;
    if !run.success {
        warn!(
            "`{}` failed (exit code {:?}):\n{}",
            run.command,
            run.code,
            run.stderr.trim_end()
        );
        return Ok(CoverageTable::new());
    }
    // Test runners print their progress to stderr.
    info!("{}", run.stderr.trim_end());

    let report = match tool.report(directory) {
        Ok(report) => report,
        Err(e) => {
            error!("Generating coverage report failed: {e}");
            return Ok(CoverageTable::new());
        }
    };

    let table = TextReportParser.parse(&report);
    if table.is_empty() {
        warn!("coverage report contained no file rows");
    }
    Ok(ignore.filter(table))
}
