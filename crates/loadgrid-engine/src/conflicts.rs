//! Overallocation detection and utilization bands

use std::fmt;

use loadgrid_core::{EmployeeName, ProjectId, FULL_TIME_EFFORT};
use serde::Serialize;

use crate::employees::EmployeeLoads;

/// An employee booked beyond a full-time month
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Conflict {
    pub employee: EmployeeName,
    pub month: String,
    pub total_effort: f64,
    /// `total_effort / full_time * 100`
    pub percent: f64,
    pub projects: Vec<(ProjectId, f64)>,
}

impl Conflict {
    /// One-line description, e.g. `Ann is allocated 125% in 2025-03 (A + B)`
    pub fn summary(&self) -> String {
        let projects: Vec<&str> = self.projects.iter().map(|(p, _)| p.as_str()).collect();
        format!(
            "{} is allocated {:.0}% in {} ({})",
            self.employee,
            self.percent,
            self.month,
            projects.join(" + ")
        )
    }
}

/// Conflicts against the standard 4.0 full-time month
pub fn detect_conflicts(loads: &EmployeeLoads) -> Vec<Conflict> {
    detect_conflicts_with(loads, FULL_TIME_EFFORT)
}

/// Every load strictly above `full_time`, in the loads' iteration order.
///
/// Exactly `full_time` is fully booked, not a conflict.
pub fn detect_conflicts_with(loads: &EmployeeLoads, full_time: f64) -> Vec<Conflict> {
    let conflicts: Vec<Conflict> = loads
        .iter()
        .filter(|load| load.total_effort > full_time)
        .map(|load| Conflict {
            employee: load.employee.clone(),
            month: load.month.clone(),
            total_effort: load.total_effort,
            percent: load.percent(full_time),
            projects: load.contributing_projects.clone(),
        })
        .collect();
    if !conflicts.is_empty() {
        tracing::debug!(count = conflicts.len(), full_time, "overallocations detected");
    }
    conflicts
}

/// Utilization band of one employee-month
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationBand {
    /// Exactly 0%
    #[serde(rename = "none")]
    Unallocated,
    Low,
    Medium,
    High,
    Over,
}

impl UtilizationBand {
    pub fn classify(percent: f64) -> Self {
        if percent == 0.0 {
            UtilizationBand::Unallocated
        } else if percent < 50.0 {
            UtilizationBand::Low
        } else if percent < 75.0 {
            UtilizationBand::Medium
        } else if percent <= 100.0 {
            UtilizationBand::High
        } else {
            UtilizationBand::Over
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationBand::Unallocated => "none",
            UtilizationBand::Low => "low",
            UtilizationBand::Medium => "medium",
            UtilizationBand::High => "high",
            UtilizationBand::Over => "over",
        }
    }
}

impl fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
