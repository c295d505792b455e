//! End-to-end checks over a portfolio loaded from sheet exports
//!
//! Run with: cargo test --test portfolio_workflow

use loadgrid_core::sample::sample_portfolio;
use loadgrid_core::{DepartmentFilter, Phase, Portfolio, YearMonth};
use loadgrid_engine::{
    aggregate, aggregate_par, capacity_plan, demand_trend, detect_conflicts, dominant_phase, heatmap, kpis,
    monthly_demand, shift_records, CapacityBand, RecordFilter,
};
use loadgrid_parser::parse_portfolio_json;
use pretty_assertions::assert_eq;

fn month(token: &str) -> YearMonth {
    token.parse().unwrap()
}

fn portfolio() -> Portfolio {
    parse_portfolio_json(
        r#"{
        "projects": [
            {"Project": "ENERGIZE", "Department": "DIGITAL", "Total_MM": 30},
            {"Project": "PATAFEST", "Department": "DIGITAL", "Total_MM": 28},
            {"Project": "THESEUS", "Department": "SCI & ENG", "Total_MM": 45},
            {"Project": "UP-SKILL", "Department": "PMO", "Total_MM": 20}
        ],
        "allocations": [
            {"Project": "ENERGIZE", "Date": "2025-02", "Phase": "Design", "MM": 3,
             "Employees": "Alex Morgan (1.5), Emma Thompson (1.5)"},
            {"Project": "ENERGIZE", "Date": "2025-02", "Phase": "Planning", "MM": 1,
             "Employees": "Alex Morgan (1.0)"},
            {"Project": "PATAFEST", "Date": "2025-02", "Phase": "Development", "MM": 6,
             "Employees": "Alex Morgan (2.25), Ryan Park (2.0), Olivia Martinez (1.75)"},
            {"Project": "THESEUS", "Date": "2025-02", "Phase": "Testing", "MM": 8,
             "Employees": "Dr. Sarah Chen (4.0), Dr. Maria Garcia (4.0)"},
            {"Project": "THESEUS", "Date": "2025-03", "Phase": "Delivery", "MM": 20,
             "Employees": "Dr. Sarah Chen (2.0)"},
            {"Project": "UP-SKILL", "Date": "2025-03", "Phase": null, "MM": 10, "Employees": ""}
        ]
    }"#,
    )
    .unwrap()
}

#[test]
fn dominant_phase_drops_the_minority_phase() {
    let portfolio = portfolio();
    let cell = dominant_phase(&portfolio.allocations, "ENERGIZE", month("2025-02"));
    assert_eq!(cell.phase, Some(Phase::Design));
    assert_eq!(cell.effort, 3.0);
    assert_eq!(cell.records, 2);
}

#[test]
fn overallocation_across_projects() {
    let portfolio = portfolio();
    let conflicts = detect_conflicts(&aggregate(&portfolio.allocations));

    assert_eq!(conflicts.len(), 1);
    assert_eq!(
        conflicts[0].summary(),
        "Alex Morgan is allocated 119% in 2025-02 (ENERGIZE + ENERGIZE + PATAFEST)"
    );
    // Sarah Chen is at exactly 4.0 in February
    assert!(conflicts.iter().all(|c| c.employee != "Dr. Sarah Chen"));
}

#[test]
fn demand_ignores_department_filter() {
    let portfolio = portfolio();
    let filter = DepartmentFilter::Only("PMO".into());

    let rows = heatmap(&portfolio, &filter, &[month("2025-03")]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cells[0].1.effort, 10.0);

    assert_eq!(monthly_demand(&portfolio.allocations, month("2025-03")), 30.0);
    let plan = capacity_plan(&portfolio.allocations, &month("2025-02").months(2), 40.0);
    assert_eq!(plan[0].demand, 18.0);
    assert_eq!(plan[0].band, CapacityBand::Comfortable);
    assert_eq!(plan[1].band, CapacityBand::Tight);

    let kpis = kpis(&portfolio, &filter, month("2025-03"));
    assert_eq!(kpis.total_projects, 1);
    assert_eq!(kpis.active_projects, 1);
}

#[test]
fn shifting_moves_cells_and_demand() {
    let mut portfolio = portfolio();
    let report = shift_records(&mut portfolio.allocations, &RecordFilter::new().project("THESEUS"), 1);
    assert_eq!(report.shifted, 2);

    let trend = demand_trend(&portfolio.allocations, &month("2025-02").months(3));
    assert_eq!(
        trend,
        vec![(month("2025-02"), 10.0), (month("2025-03"), 18.0), (month("2025-04"), 20.0)]
    );
    let cell = dominant_phase(&portfolio.allocations, "THESEUS", month("2025-04"));
    assert_eq!(cell.phase, Some(Phase::Delivery));
}

#[test]
fn sample_portfolio_parallel_matches_sequential() {
    let portfolio = sample_portfolio(month("2025-01"));
    assert!(portfolio.unknown_projects().is_empty());

    let sequential = aggregate(&portfolio.allocations);
    let parallel = aggregate_par(&portfolio.allocations);
    assert_eq!(parallel, sequential);
    assert!(!sequential.is_empty());
}

#[test]
fn unpadded_dates_land_in_the_same_month_everywhere() {
    let portfolio = parse_portfolio_json(
        r#"{
        "projects": [{"Project": "A", "Department": "PMO", "Total_MM": 10}],
        "allocations": [
            {"Project": "A", "Date": "2025-7", "Phase": "Design", "MM": 5, "Employees": "Ann (5.0)"}
        ]
    }"#,
    )
    .unwrap();
    let july = month("2025-07");

    let cell = dominant_phase(&portfolio.allocations, "A", july);
    assert!(!cell.is_idle());
    assert_eq!(cell.effort, 5.0);
    assert_eq!(monthly_demand(&portfolio.allocations, july), 5.0);

    let loads = aggregate(&portfolio.allocations);
    let conflicts = detect_conflicts(&loads);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].month, "2025-07");

    let grid = loadgrid_engine::utilization_grid(&loads, &[july], loadgrid_core::FULL_TIME_EFFORT);
    assert_eq!(grid[0].cells[0].percent, 125.0);
}
