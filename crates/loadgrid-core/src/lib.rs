//! # loadgrid-core
//!
//! Core domain model for the loadgrid workload engine.
//!
//! This crate provides:
//! - Domain types: `Phase`, `AllocationRecord`, `ProjectMeta`, `Portfolio`
//! - Calendar arithmetic over `YYYY-MM` tokens (`calendar`)
//! - Engine settings and their defaults (`settings`)
//! - A deterministic sample portfolio (`sample`)
//!
//! ## Example
//!
//! ```rust
//! use loadgrid_core::{AllocationRecord, Phase, Portfolio, ProjectMeta};
//!
//! let mut portfolio = Portfolio::default();
//! portfolio.projects.push(ProjectMeta::new("BIORADAR", "SCI & ENG", 60.0));
//! portfolio.allocations.push(
//!     AllocationRecord::new("BIORADAR", "2025-03", 6.0)
//!         .phase(Phase::Development)
//!         .employees("Dr. Sarah Chen (3.0), Dr. James Wilson (3.0)"),
//! );
//! assert!(portfolio.unknown_projects().is_empty());
//! ```

pub mod calendar;
pub mod sample;
pub mod settings;

pub use calendar::YearMonth;
pub use settings::{Settings, SettingsError, AVAILABLE_CAPACITY, FULL_TIME_EFFORT};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a project
pub type ProjectId = String;

/// Employee display name as written in allocation annotations
pub type EmployeeName = String;

// ============================================================================
// Phase
// ============================================================================

/// Project lifecycle stage.
///
/// Declaration order is the canonical order used wherever phases must be
/// ranked deterministically (e.g. equal-effort ties).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Planning,
    Design,
    Development,
    Testing,
    Delivery,
}

impl Phase {
    /// All phases in canonical order
    pub const ALL: [Phase; 5] = [
        Phase::Planning,
        Phase::Design,
        Phase::Development,
        Phase::Testing,
        Phase::Delivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "Planning",
            Phase::Design => "Design",
            Phase::Development => "Development",
            Phase::Testing => "Testing",
            Phase::Delivery => "Delivery",
        }
    }

    /// Lenient lookup: case-insensitive, surrounding whitespace ignored.
    /// Anything unrecognized is "no phase".
    pub fn parse(text: &str) -> Option<Phase> {
        let text = text.trim();
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(text))
    }

    /// Position in canonical order; "no phase" sorts after every phase
    pub fn rank(phase: Option<Phase>) -> usize {
        phase.map_or(Phase::ALL.len(), |p| p as usize)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// One row of portfolio allocation data.
///
/// `month` is kept as the raw token so that a malformed date loaded from a
/// sheet survives untouched; use [`AllocationRecord::year_month`] to parse it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    #[serde(rename = "Project")]
    pub project: ProjectId,
    #[serde(rename = "Date")]
    pub month: String,
    #[serde(rename = "Phase")]
    pub phase: Option<Phase>,
    /// Man-months attributed to this row
    #[serde(rename = "MM")]
    pub effort: f64,
    /// Free-text `"Name (effort), ..."` annotation
    #[serde(rename = "Employees", default)]
    pub employees: Option<String>,
}

impl AllocationRecord {
    /// Create a record with no phase and no employee annotation
    pub fn new(project: impl Into<String>, month: impl Into<String>, effort: f64) -> Self {
        Self {
            project: project.into(),
            month: month.into(),
            phase: None,
            effort,
            employees: None,
        }
    }

    /// Set the lifecycle phase
    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attach an employee annotation
    pub fn employees(mut self, annotation: impl Into<String>) -> Self {
        self.employees = Some(annotation.into());
        self
    }

    /// Parse the month token
    pub fn year_month(&self) -> Result<YearMonth, FormatError> {
        self.month.parse()
    }

    /// Exact token match against a canonical `YYYY-MM` string
    pub fn in_month(&self, token: &str) -> bool {
        self.month == token
    }

    /// The annotation, if present and not blank
    pub fn annotation(&self) -> Option<&str> {
        self.employees
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Per-project metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(rename = "Project")]
    pub project: ProjectId,
    #[serde(rename = "Department")]
    pub department: String,
    /// Overall man-month budget
    #[serde(rename = "Total_MM")]
    pub total_budget: f64,
}

impl ProjectMeta {
    pub fn new(project: impl Into<String>, department: impl Into<String>, total_budget: f64) -> Self {
        Self {
            project: project.into(),
            department: department.into(),
            total_budget,
        }
    }
}

// ============================================================================
// Portfolio
// ============================================================================

/// Department selection applied to project-level views.
///
/// Capacity demand deliberately ignores this filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(String),
}

impl DepartmentFilter {
    /// `None` and the literal `"All"` both select every department
    pub fn from_option(department: Option<&str>) -> Self {
        match department {
            None => DepartmentFilter::All,
            Some(d) if d.eq_ignore_ascii_case("all") => DepartmentFilter::All,
            Some(d) => DepartmentFilter::Only(d.to_string()),
        }
    }

    pub fn matches(&self, department: &str) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Only(d) => d == department,
        }
    }
}

/// Application state: the two record sets a session works on.
///
/// Owned by the caller and passed into every engine query; the engine keeps
/// no state between calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub projects: Vec<ProjectMeta>,
    pub allocations: Vec<AllocationRecord>,
}

impl Portfolio {
    pub fn new(projects: Vec<ProjectMeta>, allocations: Vec<AllocationRecord>) -> Self {
        Self {
            projects,
            allocations,
        }
    }

    /// Get project metadata by id
    pub fn get_project(&self, id: &str) -> Option<&ProjectMeta> {
        self.projects.iter().find(|p| p.project == id)
    }

    /// Distinct department labels, sorted
    pub fn departments(&self) -> Vec<&str> {
        self.projects
            .iter()
            .map(|p| p.department.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Projects passing the department filter, in input order
    pub fn projects_in(&self, filter: &DepartmentFilter) -> Vec<&ProjectMeta> {
        self.projects
            .iter()
            .filter(|p| filter.matches(&p.department))
            .collect()
    }

    /// Allocation projects with no metadata row, in first-seen order
    pub fn unknown_projects(&self) -> Vec<&str> {
        let known: HashSet<&str> = self.projects.iter().map(|p| p.project.as_str()).collect();
        let mut seen = HashSet::new();
        self.allocations
            .iter()
            .map(|a| a.project.as_str())
            .filter(|id| !known.contains(id) && seen.insert(*id))
            .collect()
    }

    /// Project ids that appear more than once in the metadata
    pub fn duplicate_projects(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.projects
            .iter()
            .map(|p| p.project.as_str())
            .filter(|id| !seen.insert(*id) && reported.insert(*id))
            .collect()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Malformed calendar token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid year-month '{0}': expected YYYY-MM")]
    InvalidYearMonth(String),

    #[error("Month {month} out of range in '{token}'")]
    MonthOutOfRange { token: String, month: u32 },

    #[error("Shifting '{token}' by {delta} months leaves the supported year range")]
    YearOutOfRange { token: String, delta: i32 },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![
                ProjectMeta::new("ENERGIZE", "DIGITAL", 40.0),
                ProjectMeta::new("FOODSAFER", "PMO", 35.0),
                ProjectMeta::new("BIORADAR", "SCI & ENG", 60.0),
                ProjectMeta::new("PATAFEST", "DIGITAL", 30.0),
            ],
            vec![
                AllocationRecord::new("ENERGIZE", "2025-01", 2.0),
                AllocationRecord::new("GHOST", "2025-01", 1.0),
                AllocationRecord::new("GHOST", "2025-02", 1.0),
                AllocationRecord::new("PHANTOM", "2025-02", 1.0),
            ],
        )
    }

    #[test]
    fn phase_parse_is_lenient() {
        assert_eq!(Phase::parse("Design"), Some(Phase::Design));
        assert_eq!(Phase::parse("  testing "), Some(Phase::Testing));
        assert_eq!(Phase::parse("DELIVERY"), Some(Phase::Delivery));
        assert_eq!(Phase::parse("Idle"), None);
        assert_eq!(Phase::parse(""), None);
    }

    #[test]
    fn phase_rank_puts_none_last() {
        let ranks: Vec<usize> = Phase::ALL.iter().map(|p| Phase::rank(Some(*p))).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        assert_eq!(Phase::rank(None), 5);
    }

    #[test]
    fn record_builder() {
        let record = AllocationRecord::new("THESEUS", "2025-04", 3.0)
            .phase(Phase::Testing)
            .employees("Dr. Maria Garcia (1.5), Dr. Ahmed Hassan (1.5)");

        assert_eq!(record.project, "THESEUS");
        assert_eq!(record.phase, Some(Phase::Testing));
        assert_eq!(record.effort, 3.0);
        assert!(record.in_month("2025-04"));
        assert_eq!(record.year_month().unwrap().to_string(), "2025-04");
    }

    #[test]
    fn blank_annotation_is_none() {
        let record = AllocationRecord::new("A", "2025-01", 1.0).employees("   ");
        assert_eq!(record.annotation(), None);
        assert_eq!(AllocationRecord::new("A", "2025-01", 1.0).annotation(), None);
    }

    #[test]
    fn departments_sorted_and_unique() {
        assert_eq!(portfolio().departments(), vec!["DIGITAL", "PMO", "SCI & ENG"]);
    }

    #[test]
    fn department_filter() {
        let p = portfolio();
        let digital = DepartmentFilter::from_option(Some("DIGITAL"));
        let ids: Vec<&str> = p.projects_in(&digital).iter().map(|m| m.project.as_str()).collect();
        assert_eq!(ids, vec!["ENERGIZE", "PATAFEST"]);

        assert_eq!(DepartmentFilter::from_option(Some("All")), DepartmentFilter::All);
        assert_eq!(p.projects_in(&DepartmentFilter::All).len(), 4);
    }

    #[test]
    fn unknown_projects_first_seen_order() {
        assert_eq!(portfolio().unknown_projects(), vec!["GHOST", "PHANTOM"]);
    }

    #[test]
    fn duplicate_projects_reported_once() {
        let mut p = portfolio();
        p.projects.push(ProjectMeta::new("ENERGIZE", "DIGITAL", 1.0));
        p.projects.push(ProjectMeta::new("ENERGIZE", "DIGITAL", 2.0));
        assert_eq!(p.duplicate_projects(), vec!["ENERGIZE"]);
    }

    #[test]
    fn record_serializes_with_sheet_headers() {
        let record = AllocationRecord::new("ENERGIZE", "2025-01", 2.0).phase(Phase::Design);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Project"], "ENERGIZE");
        assert_eq!(json["Date"], "2025-01");
        assert_eq!(json["Phase"], "Design");
        assert_eq!(json["MM"], 2.0);
        assert!(json["Employees"].is_null());
    }

    #[test]
    fn format_error_display() {
        let err = FormatError::InvalidYearMonth("soon".into());
        assert_eq!(err.to_string(), "Invalid year-month 'soon': expected YYYY-MM");
    }
}
