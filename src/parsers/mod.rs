pub mod text;

use crate::model::CoverageTable;

/// Every report parser implements this trait.
pub trait ReportParser {
    /// Parse tool output into per-file rows. Input that does not look like a
    /// report yields an empty table rather than an error.
    fn parse(&self, input: &str) -> CoverageTable;
}
