//! Read-only portfolio views
//!
//! Each function projects the record set onto one of the dashboard panels:
//! headline counts, the phase heat map, the yearly timeline, the per-employee
//! utilization grid and department budget totals. Nothing here mutates the
//! portfolio.

use std::collections::{BTreeMap, HashSet};

use loadgrid_core::{AllocationRecord, DepartmentFilter, Portfolio, ProjectId, YearMonth};
use serde::Serialize;

use crate::capacity::monthly_demand;
use crate::conflicts::UtilizationBand;
use crate::employees::EmployeeLoads;
use crate::index::{dominant_phase, effort_and_phase_and_employees, CellSummary};

/// Contributing projects listed per utilization cell
const CELL_PROJECTS: usize = 2;

/// Headline counts for a focus month
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    /// Distinct projects passing the department filter
    pub total_projects: usize,
    /// Of those, projects with at least one allocation row in the focus month
    pub active_projects: usize,
    pub low_activity: usize,
}

pub fn kpis(portfolio: &Portfolio, filter: &DepartmentFilter, focus: YearMonth) -> Kpis {
    let in_view: HashSet<&str> = portfolio
        .projects_in(filter)
        .into_iter()
        .map(|p| p.project.as_str())
        .collect();
    let token = focus.to_string();
    let active: HashSet<&str> = portfolio
        .allocations
        .iter()
        .filter(|a| a.in_month(&token) && in_view.contains(a.project.as_str()))
        .map(|a| a.project.as_str())
        .collect();

    Kpis {
        total_projects: in_view.len(),
        active_projects: active.len(),
        low_activity: in_view.len() - active.len(),
    }
}

/// One project's cells across a month range
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub project: ProjectId,
    pub department: String,
    pub cells: Vec<(YearMonth, CellSummary)>,
}

fn project_rows(
    portfolio: &Portfolio,
    filter: &DepartmentFilter,
    months: &[YearMonth],
    cell: fn(&[AllocationRecord], &str, YearMonth) -> CellSummary,
) -> Vec<HeatmapRow> {
    let mut projects = portfolio.projects_in(filter);
    projects.sort_by(|a, b| a.project.cmp(&b.project));
    projects.dedup_by(|a, b| a.project == b.project);

    projects
        .into_iter()
        .map(|meta| HeatmapRow {
            project: meta.project.clone(),
            department: meta.department.clone(),
            cells: months
                .iter()
                .map(|&month| (month, cell(&portfolio.allocations, &meta.project, month)))
                .collect(),
        })
        .collect()
}

/// Dominant phase per project and month, rows sorted by project
pub fn heatmap(portfolio: &Portfolio, filter: &DepartmentFilter, months: &[YearMonth]) -> Vec<HeatmapRow> {
    project_rows(portfolio, filter, months, dominant_phase)
}

/// Like [`heatmap`], with the employee annotation of each cell
pub fn timeline(portfolio: &Portfolio, filter: &DepartmentFilter, months: &[YearMonth]) -> Vec<HeatmapRow> {
    project_rows(portfolio, filter, months, effort_and_phase_and_employees)
}

/// One employee-month in the utilization grid
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UtilizationCell {
    pub month: YearMonth,
    pub percent: f64,
    pub band: UtilizationBand,
    /// First contributing projects, at most two
    pub projects: Vec<ProjectId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UtilizationRow {
    pub employee: String,
    pub cells: Vec<UtilizationCell>,
}

/// Per-employee utilization over `months`, employees sorted by name
pub fn utilization_grid(loads: &EmployeeLoads, months: &[YearMonth], full_time: f64) -> Vec<UtilizationRow> {
    loads
        .employees()
        .into_iter()
        .map(|employee| UtilizationRow {
            employee: employee.to_string(),
            cells: months
                .iter()
                .map(|&month| {
                    let load = loads.get(employee, &month.to_string());
                    let percent = load.map_or(0.0, |l| l.percent(full_time));
                    UtilizationCell {
                        month,
                        percent,
                        band: UtilizationBand::classify(percent),
                        projects: load
                            .map(|l| {
                                l.contributing_projects
                                    .iter()
                                    .take(CELL_PROJECTS)
                                    .map(|(p, _)| p.clone())
                                    .collect()
                            })
                            .unwrap_or_default(),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Summed project budgets per department, sorted by department
pub fn department_budgets(portfolio: &Portfolio, filter: &DepartmentFilter) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for meta in portfolio.projects_in(filter) {
        *totals.entry(meta.department.as_str()).or_default() += meta.total_budget;
    }
    totals
        .into_iter()
        .map(|(department, total)| (department.to_string(), total))
        .collect()
}

/// Portfolio-wide demand for each month
pub fn demand_trend(records: &[AllocationRecord], months: &[YearMonth]) -> Vec<(YearMonth, f64)> {
    months
        .iter()
        .map(|&month| (month, monthly_demand(records, month)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employees::aggregate;
    use loadgrid_core::{Phase, ProjectMeta};
    use pretty_assertions::assert_eq;

    fn month(token: &str) -> YearMonth {
        token.parse().unwrap()
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(
            vec![
                ProjectMeta::new("THESEUS", "SCI & ENG", 45.0),
                ProjectMeta::new("ENERGIZE", "DIGITAL", 30.0),
                ProjectMeta::new("DIGITRANS", "DIGITAL", 25.0),
                ProjectMeta::new("UP-SKILL", "PMO", 20.0),
            ],
            vec![
                AllocationRecord::new("ENERGIZE", "2025-02", 3.0)
                    .phase(Phase::Design)
                    .employees("Alex (1.5), Emma (1.5)"),
                AllocationRecord::new("THESEUS", "2025-02", 8.0).phase(Phase::Testing),
                AllocationRecord::new("THESEUS", "2025-03", 6.0).phase(Phase::Delivery),
                AllocationRecord::new("GHOST", "2025-02", 2.0),
            ],
        )
    }

    #[test]
    fn kpis_for_focus_month() {
        let kpis = kpis(&portfolio(), &DepartmentFilter::All, month("2025-02"));
        assert_eq!(
            kpis,
            Kpis {
                total_projects: 4,
                active_projects: 2,
                low_activity: 2,
            }
        );
    }

    #[test]
    fn kpis_respect_department_filter() {
        let filter = DepartmentFilter::Only("DIGITAL".into());
        let kpis = kpis(&portfolio(), &filter, month("2025-03"));
        assert_eq!(kpis.total_projects, 2);
        assert_eq!(kpis.active_projects, 0);
        assert_eq!(kpis.low_activity, 2);
    }

    #[test]
    fn heatmap_rows_are_sorted_and_filtered() {
        let months = month("2025-02").months(2);
        let rows = heatmap(&portfolio(), &DepartmentFilter::All, &months);
        let names: Vec<&str> = rows.iter().map(|r| r.project.as_str()).collect();
        assert_eq!(names, vec!["DIGITRANS", "ENERGIZE", "THESEUS", "UP-SKILL"]);

        let theseus = &rows[2];
        assert_eq!(theseus.cells[0].1.phase, Some(Phase::Testing));
        assert_eq!(theseus.cells[1].1.phase, Some(Phase::Delivery));
        assert!(rows[0].cells.iter().all(|(_, cell)| cell.is_idle()));
        assert_eq!(rows[1].cells[0].1.employees, None);

        let digital = heatmap(&portfolio(), &DepartmentFilter::Only("DIGITAL".into()), &months);
        assert_eq!(digital.len(), 2);
    }

    #[test]
    fn timeline_carries_annotations() {
        let rows = timeline(&portfolio(), &DepartmentFilter::All, &[month("2025-02")]);
        let energize = rows.iter().find(|r| r.project == "ENERGIZE").unwrap();
        assert_eq!(
            energize.cells[0].1.employees.as_deref(),
            Some("Alex (1.5), Emma (1.5)")
        );
        assert_eq!(energize.department, "DIGITAL");
    }

    #[test]
    fn utilization_grid_fills_missing_months() {
        let records = vec![
            AllocationRecord::new("A", "2025-01", 1.0).employees("Zoe (2.0), Ann (1.0)"),
            AllocationRecord::new("B", "2025-01", 1.0).employees("Zoe (2.5)"),
            AllocationRecord::new("C", "2025-01", 1.0).employees("Zoe (0.5)"),
        ];
        let loads = aggregate(&records);
        let grid = utilization_grid(&loads, &month("2025-01").months(2), 4.0);

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].employee, "Ann");
        assert_eq!(grid[0].cells[0].percent, 25.0);
        assert_eq!(grid[0].cells[0].band, UtilizationBand::Low);

        let zoe = &grid[1].cells;
        assert_eq!(zoe[0].percent, 125.0);
        assert_eq!(zoe[0].band, UtilizationBand::Over);
        assert_eq!(zoe[0].projects, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(zoe[1].percent, 0.0);
        assert_eq!(zoe[1].band, UtilizationBand::Unallocated);
        assert!(zoe[1].projects.is_empty());
    }

    #[test]
    fn budgets_per_department() {
        assert_eq!(
            department_budgets(&portfolio(), &DepartmentFilter::All),
            vec![
                ("DIGITAL".to_string(), 55.0),
                ("PMO".to_string(), 20.0),
                ("SCI & ENG".to_string(), 45.0),
            ]
        );
        assert_eq!(
            department_budgets(&portfolio(), &DepartmentFilter::Only("PMO".into())),
            vec![("PMO".to_string(), 20.0)]
        );
    }

    #[test]
    fn demand_trend_includes_unknown_projects() {
        let trend = demand_trend(&portfolio().allocations, &month("2025-02").months(3));
        assert_eq!(
            trend,
            vec![
                (month("2025-02"), 13.0),
                (month("2025-03"), 6.0),
                (month("2025-04"), 0.0),
            ]
        );
    }
}
