//! Bulk month shifting
//!
//! Moves a selection of allocation rows forward or backward in time. Rows are
//! edited independently: a row whose month token cannot be parsed is left as
//! is and reported, and the rest of the batch still moves.

use loadgrid_core::calendar;
use loadgrid_core::{AllocationRecord, Phase};
use serde::Serialize;

/// Row selection; every criterion that is set must match
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFilter {
    pub project: Option<String>,
    pub phase: Option<Phase>,
    pub month: Option<String>,
}

impl RecordFilter {
    /// Matches every row
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn matches(&self, record: &AllocationRecord) -> bool {
        self.project.as_ref().map_or(true, |p| *p == record.project)
            && self.phase.map_or(true, |p| record.phase == Some(p))
            && self.month.as_ref().map_or(true, |m| record.in_month(m))
    }
}

/// Outcome of a bulk shift
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShiftReport {
    /// Rows whose month was rewritten
    pub shifted: usize,
    /// Month tokens of matching rows that could not be shifted
    pub skipped: Vec<String>,
}

/// Shift every row matching `filter` by `delta` months, in place.
pub fn shift_records(records: &mut [AllocationRecord], filter: &RecordFilter, delta: i32) -> ShiftReport {
    let mut report = ShiftReport::default();
    for record in records.iter_mut().filter(|r| filter.matches(r)) {
        match calendar::shift(&record.month, delta) {
            Ok(token) => {
                record.month = token;
                report.shifted += 1;
            }
            Err(e) => {
                tracing::warn!(project = %record.project, month = %record.month, "skipping row: {e}");
                report.skipped.push(record.month.clone());
            }
        }
    }
    tracing::debug!(shifted = report.shifted, skipped = report.skipped.len(), delta, "shifted allocations");
    report
}
