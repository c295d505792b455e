//! Employee-allocation extraction
//!
//! Allocation rows may carry a free-text annotation such as
//! `"Alex Morgan (1.5), Emma Thompson (1.5)"` describing how the row's effort
//! is split between people. This module parses those annotations (tolerantly:
//! anything malformed is dropped) and totals them per employee and month.
//!
//! The annotation numbers are independent of the row's own effort; no
//! cross-check is made.

use std::collections::{BTreeSet, HashMap};

use loadgrid_core::{AllocationRecord, EmployeeName, ProjectId};
use rayon::prelude::*;
use serde::Serialize;

/// Rows per rayon task in [`aggregate_par`]
const PAR_CHUNK_SIZE: usize = 512;

/// Parse an annotation into `(name, effort)` pairs.
///
/// Segments are comma-separated `Name (number)`. A segment without an opening
/// and a following closing parenthesis, with a non-numeric or non-finite
/// value, or with an empty name is skipped; the remaining segments are still
/// returned.
pub fn parse_employee_annotation(text: &str) -> Vec<(EmployeeName, f64)> {
    text.split(',').filter_map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Option<(EmployeeName, f64)> {
    let (name, rest) = segment.split_once('(')?;
    let (value, _) = rest.split_once(')')?;
    let effort: f64 = value.trim().parse().ok()?;
    let name = name.trim();
    if name.is_empty() || !effort.is_finite() {
        return None;
    }
    Some((name.to_string(), effort))
}

/// One employee's load in one month, summed across projects
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmployeeMonthLoad {
    pub employee: EmployeeName,
    /// Month token as written on the contributing rows
    pub month: String,
    pub total_effort: f64,
    /// `(project, effort)` in the order the rows were encountered
    pub contributing_projects: Vec<(ProjectId, f64)>,
}

impl EmployeeMonthLoad {
    fn new(employee: &str, month: &str) -> Self {
        Self {
            employee: employee.to_string(),
            month: month.to_string(),
            total_effort: 0.0,
            contributing_projects: Vec::new(),
        }
    }

    /// Load as a percentage of a full-time month
    pub fn percent(&self, full_time: f64) -> f64 {
        self.total_effort / full_time * 100.0
    }
}

/// Per-(employee, month) loads in first-encounter order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployeeLoads {
    entries: Vec<EmployeeMonthLoad>,
    index: HashMap<(EmployeeName, String), usize>,
}

impl EmployeeLoads {
    fn entry(&mut self, employee: &str, month: &str) -> &mut EmployeeMonthLoad {
        let key = (employee.to_string(), month.to_string());
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.entries.push(EmployeeMonthLoad::new(employee, month));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[slot]
    }

    fn add(&mut self, employee: &str, month: &str, project: &str, effort: f64) {
        let entry = self.entry(employee, month);
        entry.total_effort += effort;
        entry.contributing_projects.push((project.to_string(), effort));
    }

    pub fn get(&self, employee: &str, month: &str) -> Option<&EmployeeMonthLoad> {
        self.index
            .get(&(employee.to_string(), month.to_string()))
            .map(|&slot| &self.entries[slot])
    }

    /// Total effort for the pair, zero when the employee has nothing that month
    pub fn total(&self, employee: &str, month: &str) -> f64 {
        self.get(employee, month).map_or(0.0, |e| e.total_effort)
    }

    /// Load as a percentage of `full_time`, zero when absent
    pub fn percent(&self, employee: &str, month: &str, full_time: f64) -> f64 {
        self.get(employee, month).map_or(0.0, |e| e.percent(full_time))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EmployeeMonthLoad> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[EmployeeMonthLoad] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct employee names, sorted
    pub fn employees(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.employee.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'a> IntoIterator for &'a EmployeeLoads {
    type Item = &'a EmployeeMonthLoad;
    type IntoIter = std::slice::Iter<'a, EmployeeMonthLoad>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn accumulate(loads: &mut EmployeeLoads, record: &AllocationRecord) {
    let Some(annotation) = record.annotation() else {
        return;
    };
    for (name, effort) in parse_employee_annotation(annotation) {
        loads.add(&name, &record.month, &record.project, effort);
    }
}

/// Total every annotated row into per-(employee, month) loads.
///
/// Recomputed from scratch on each call; equal inputs give bit-identical
/// results.
pub fn aggregate(records: &[AllocationRecord]) -> EmployeeLoads {
    let mut loads = EmployeeLoads::default();
    for record in records {
        accumulate(&mut loads, record);
    }
    tracing::debug!(records = records.len(), loads = loads.len(), "aggregated employee loads");
    loads
}

/// Parallel [`aggregate`] with identical output, including entry order and
/// floating-point totals.
pub fn aggregate_par(records: &[AllocationRecord]) -> EmployeeLoads {
    aggregate_par_chunked(records, PAR_CHUNK_SIZE)
}

/// [`aggregate_par`] with an explicit chunk size
pub fn aggregate_par_chunked(records: &[AllocationRecord], chunk_size: usize) -> EmployeeLoads {
    let partials: Vec<EmployeeLoads> = records
        .par_chunks(chunk_size.max(1))
        .map(|chunk| {
            let mut loads = EmployeeLoads::default();
            for record in chunk {
                accumulate(&mut loads, record);
            }
            loads
        })
        .collect();
    merge(partials)
}

/// Merge chunk results in chunk order.
///
/// Keys are appended the first time any chunk mentions them, which is their
/// global first-encounter order. Contributions are concatenated in chunk order
/// and totals re-folded from them so the summation order matches the
/// sequential pass exactly.
fn merge(partials: Vec<EmployeeLoads>) -> EmployeeLoads {
    let mut merged = EmployeeLoads::default();
    for partial in partials {
        for load in partial.entries {
            let entry = merged.entry(&load.employee, &load.month);
            entry.contributing_projects.extend(load.contributing_projects);
        }
    }
    for entry in &mut merged.entries {
        entry.total_effort = entry
            .contributing_projects
            .iter()
            .fold(0.0, |total, (_, effort)| total + effort);
    }
    merged
}
