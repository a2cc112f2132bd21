/// Parser for the plain-text table printed by `coverage report`.
///
/// Format:
///   Name          Stmts   Miss  Cover
///   ---------------------------------
///   pkg/a.py         10      2    80%
///   pkg/b.py          4      0   100%
///   ---------------------------------
///   TOTAL            14      2    86%
///
/// Columns are located by header name, so extra columns such as `Branch`,
/// `BrPart` or a trailing `Missing` list do not confuse the parser.
use log::debug;

use super::ReportParser;
use crate::model::{CoverageRow, CoverageTable};

const TOTAL_MARKER: &str = "TOTAL";

/// `coverage report` text table parser.
pub struct TextReportParser;

impl ReportParser for TextReportParser {
    fn parse(&self, input: &str) -> CoverageTable {
        parse(input)
    }
}

/// Positions of the columns we need, taken from the header line.
struct Columns {
    stmts: usize,
    miss: usize,
    cover: usize,
}

impl Columns {
    fn from_header(line: &str) -> Option<Self> {
        let names: Vec<&str> = line.split_whitespace().collect();
        let find = |name: &str| names.iter().position(|n| n.eq_ignore_ascii_case(name));
        let columns = Self {
            stmts: find("Stmts")?,
            miss: find("Miss")?,
            cover: find("Cover")?,
        };
        // The file name always comes first.
        if columns.stmts == 0 || columns.miss == 0 || columns.cover == 0 {
            return None;
        }
        Some(columns)
    }

    fn width(&self) -> usize {
        self.stmts.max(self.miss).max(self.cover) + 1
    }
}

/// Parse a text coverage report into a table. The header, separator lines
/// and the `TOTAL` row are dropped.
pub fn parse(input: &str) -> CoverageTable {
    let mut table = CoverageTable::new();
    let mut lines = input.lines().filter(|l| !l.trim().is_empty());

    let Some(columns) = lines.next().and_then(Columns::from_header) else {
        debug!("report has no recognizable header; treating as empty");
        return table;
    };

    for line in lines {
        if is_separator(line) {
            continue;
        }
        match parse_row(line, &columns) {
            Some(row) if row.path == TOTAL_MARKER => {}
            Some(row) => table.rows.push(row),
            None => debug!("skipping unparsable report line: {line:?}"),
        }
    }

    table
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c == '-')
}

fn parse_row(line: &str, columns: &Columns) -> Option<CoverageRow> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < columns.width() {
        return None;
    }

    let statements: u64 = fields[columns.stmts].parse().ok()?;
    let missed: u64 = fields[columns.miss].parse().ok()?;
    if missed > statements {
        return None;
    }
    let coverage_percent: f64 = fields[columns.cover].strip_suffix('%')?.parse().ok()?;
    if !(0.0..=100.0).contains(&coverage_percent) {
        return None;
    }

    Some(CoverageRow {
        path: fields[0].to_string(),
        statements,
        missed,
        coverage_percent,
    })
}
