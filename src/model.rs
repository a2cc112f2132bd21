//! In-memory representation of one coverage run. Everything here lives for a
//! single invocation: the parser produces a `CoverageTable`, the classifier
//! reduces it to a `CoverageSummary` and a `BadgeSpec`.

use serde::Serialize;

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Coverage for a single measured file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub path: String,
    pub statements: u64,
    pub missed: u64,
    /// Percentage as printed by the tool (0-100).
    pub coverage_percent: f64,
}

impl CoverageRow {
    #[must_use]
    pub fn covered(&self) -> u64 {
        self.statements.saturating_sub(self.missed)
    }
}

/// Per-file rows in tool output order. The aggregate total row is never
/// stored here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageTable {
    pub rows: Vec<CoverageRow>,
}

impl CoverageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum of statements over all rows, `None` on overflow.
    pub fn total_statements(&self) -> Option<u64> {
        self.rows
            .iter()
            .try_fold(0u64, |acc, r| acc.checked_add(r.statements))
    }

    /// Sum of covered statements over all rows, `None` on overflow.
    pub fn total_covered(&self) -> Option<u64> {
        self.rows
            .iter()
            .try_fold(0u64, |acc, r| acc.checked_add(r.covered()))
    }

    /// Reduce the table to a single percentage. An empty table, one without
    /// any statements, or one whose totals do not fit in a `u64` is a failed
    /// measurement.
    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        let (Some(total), Some(covered)) = (self.total_statements(), self.total_covered()) else {
            return CoverageSummary::failed();
        };
        if total == 0 {
            return CoverageSummary::failed();
        }
        CoverageSummary {
            overall_percent: round1(rate(covered, total) * 100.0),
            status: CoverageStatus::Measured,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Measured,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub overall_percent: f64,
    pub status: CoverageStatus,
}

impl CoverageSummary {
    pub fn failed() -> Self {
        Self {
            overall_percent: 0.0,
            status: CoverageStatus::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == CoverageStatus::Failed
    }
}

/// What the badge service needs to render an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeSpec {
    pub label: String,
    pub value: String,
    pub color: String,
}
