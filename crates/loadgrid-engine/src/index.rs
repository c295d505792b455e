//! Allocation index
//!
//! Answers per-cell questions about the allocation records: which phase
//! dominates project P in month M, how much effort that phase carries, and
//! which employee annotation goes with it.
//!
//! A (project, month) cell may hold several rows, e.g. a month split across
//! two phases. Rows are grouped by phase and the group with the largest summed
//! effort wins. The reported effort is that group's sum only: a 60/40 split
//! reports the 60 and drops the 40. Equal sums resolve in canonical phase
//! order, with the "no phase" group ranked last.

use loadgrid_core::{AllocationRecord, Phase, YearMonth};
use serde::Serialize;

/// Summary of one (project, month) cell
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellSummary {
    /// Winning phase; `None` when idle or when unphased rows win
    pub phase: Option<Phase>,
    /// Summed effort of the winning phase group
    pub effort: f64,
    /// Annotation of the winning group's first annotated row
    pub employees: Option<String>,
    /// Number of rows matching the cell, across all phases
    pub records: usize,
}

impl CellSummary {
    /// A cell with no records
    pub fn idle() -> Self {
        Self {
            phase: None,
            effort: 0.0,
            employees: None,
            records: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.records == 0
    }
}

/// One slot per phase in canonical order, plus the trailing "no phase" slot
const GROUP_SLOTS: usize = Phase::ALL.len() + 1;

#[derive(Clone, Copy)]
struct PhaseGroup<'a> {
    phase: Option<Phase>,
    effort: f64,
    annotation: Option<&'a str>,
}

/// Group the cell's rows by phase and pick the winner
fn winning_group<'a>(
    records: &'a [AllocationRecord],
    project: &str,
    month: YearMonth,
) -> (Option<PhaseGroup<'a>>, usize) {
    let token = month.to_string();
    let mut groups: [Option<PhaseGroup<'a>>; GROUP_SLOTS] = [None; GROUP_SLOTS];
    let mut matched = 0;

    for record in records
        .iter()
        .filter(|r| r.project == project && r.in_month(&token))
    {
        matched += 1;
        let group = groups[Phase::rank(record.phase)].get_or_insert(PhaseGroup {
            phase: record.phase,
            effort: 0.0,
            annotation: None,
        });
        group.effort += record.effort;
        if group.annotation.is_none() {
            group.annotation = record.annotation();
        }
    }

    let mut best: Option<PhaseGroup<'a>> = None;
    for group in groups.into_iter().flatten() {
        if best.map_or(true, |b| group.effort > b.effort) {
            best = Some(group);
        }
    }
    (best, matched)
}

/// Dominant phase and its effort for `project` in `month`.
///
/// No matching rows yields [`CellSummary::idle`].
pub fn dominant_phase(records: &[AllocationRecord], project: &str, month: YearMonth) -> CellSummary {
    match winning_group(records, project, month) {
        (Some(group), matched) => CellSummary {
            phase: group.phase,
            effort: group.effort,
            employees: None,
            records: matched,
        },
        (None, _) => CellSummary::idle(),
    }
}

/// Like [`dominant_phase`], also returning the winning group's annotation.
///
/// The annotation is taken from the first row of the group that has one;
/// annotations of further rows are not concatenated.
pub fn effort_and_phase_and_employees(
    records: &[AllocationRecord],
    project: &str,
    month: YearMonth,
) -> CellSummary {
    match winning_group(records, project, month) {
        (Some(group), matched) => CellSummary {
            phase: group.phase,
            effort: group.effort,
            employees: group.annotation.map(str::to_string),
            records: matched,
        },
        (None, _) => CellSummary::idle(),
    }
}
