//! Plain-text views
//!
//! Each renderer returns the full text for one subcommand. JSON output does
//! not go through here; see [`crate::output`].

use loadgrid_core::{Portfolio, YearMonth};
use loadgrid_engine::{CellSummary, Conflict, HeatmapRow, Kpis, MonthCapacity, UtilizationRow};

const NAME_WIDTH: usize = 16;
const CELL_WIDTH: usize = 16;

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// One table line: a name column followed by fixed-width cells
fn table_line(first: &str, cells: impl IntoIterator<Item = String>) -> String {
    let mut line = format!("{:<NAME_WIDTH$}", truncate(first, NAME_WIDTH));
    for cell in cells {
        line.push_str(&format!(" {cell:<CELL_WIDTH$}"));
    }
    line.push('\n');
    line
}

fn phase_cell(cell: &CellSummary) -> String {
    if cell.is_idle() {
        return "-".to_string();
    }
    let phase = cell.phase.map_or("(none)", |p| p.as_str());
    format!("{phase} {:.1}", cell.effort)
}

/// Project rows against months, showing the dominant phase of each cell
pub fn heatmap(rows: &[HeatmapRow], months: &[YearMonth]) -> String {
    let mut out = table_line("Project", months.iter().map(ToString::to_string));
    for row in rows {
        out.push_str(&table_line(&row.project, row.cells.iter().map(|(_, cell)| phase_cell(cell))));
    }
    if rows.is_empty() {
        out.push_str("No projects in view\n");
    }
    out
}

/// One block per project listing each month with its people
pub fn timeline(rows: &[HeatmapRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("{} [{}]\n", row.project, row.department));
        for (month, cell) in &row.cells {
            out.push_str(&format!("  {month}  {}", phase_cell(cell)));
            if let Some(people) = &cell.employees {
                out.push_str(&format!("  {people}"));
            }
            out.push('\n');
        }
    }
    if rows.is_empty() {
        out.push_str("No projects in view\n");
    }
    out
}

pub fn conflicts(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return "No overallocations\n".to_string();
    }
    let mut out = format!("{} overallocation(s)\n", conflicts.len());
    for conflict in conflicts {
        out.push_str(&format!("  {}\n", conflict.summary()));
    }
    out
}

/// Employee rows against months (`Jan 2025` headings): percent, band and leading projects
pub fn utilization(rows: &[UtilizationRow], months: &[YearMonth]) -> String {
    let labels = months.iter().map(|m| format!("{} {}", m.month_label(), m.year()));
    let mut out = table_line("Employee", labels);
    for row in rows {
        let cells = row.cells.iter().map(|cell| format!("{:.0}% {}", cell.percent, cell.band));
        out.push_str(&table_line(&row.employee, cells));
    }
    if rows.is_empty() {
        out.push_str("No employee annotations\n");
    }
    out
}

pub fn capacity(plan: &[MonthCapacity], average: Option<f64>) -> String {
    let mut out = format!("{:<8} {:>8} {:>9} {:>6}  band\n", "Month", "Demand", "Available", "Use");
    for month in plan {
        out.push_str(&format!(
            "{:<8} {:>8.1} {:>9.1} {:>5.0}%  {}\n",
            month.month.to_string(),
            month.demand,
            month.available,
            month.percent,
            month.band
        ));
    }
    match average {
        Some(avg) => out.push_str(&format!("Average demand: {avg:.1} MM/month\n")),
        None => out.push_str("Average demand: no allocations\n"),
    }
    out
}

pub fn summary(kpis: &Kpis, focus: YearMonth, budgets: &[(String, f64)]) -> String {
    let mut out = format!(
        "Focus month:        {focus}\n\
         Total projects:     {}\n\
         Active this month:  {}\n\
         Low activity:       {}\n",
        kpis.total_projects, kpis.active_projects, kpis.low_activity
    );
    out.push_str("\nBudget by department\n");
    let total = budgets.iter().fold(0.0, |acc, (_, budget)| acc + budget);
    for (department, budget) in budgets {
        out.push_str(&format!("  {department:<14} {budget:>7.0} MM\n"));
    }
    out.push_str(&format!("  {:<14} {total:>7.0} MM\n", "Total"));
    out
}

/// Load report for `check`
pub fn check(portfolio: &Portfolio) -> String {
    let mut out = format!(
        "{} projects, {} allocation rows, {} departments\n",
        portfolio.projects.len(),
        portfolio.allocations.len(),
        portfolio.departments().len()
    );
    let unknown = portfolio.unknown_projects();
    let duplicates = portfolio.duplicate_projects();
    if !unknown.is_empty() {
        out.push_str(&format!("error: allocations for unknown projects: {}\n", unknown.join(", ")));
    }
    if !duplicates.is_empty() {
        out.push_str(&format!("error: duplicate project ids: {}\n", duplicates.join(", ")));
    }
    let bad_months = portfolio
        .allocations
        .iter()
        .filter(|a| a.year_month().is_err())
        .count();
    if bad_months > 0 {
        out.push_str(&format!("warning: {bad_months} rows have an unreadable Date\n"));
    }
    out
}
