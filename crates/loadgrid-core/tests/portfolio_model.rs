//! Portfolio model behavior across modules: sample data, settings, calendar

use loadgrid_core::sample::{sample_portfolio, sample_portfolio_with_seed, SAMPLE_MONTHS};
use loadgrid_core::{calendar, AllocationRecord, DepartmentFilter, Settings, YearMonth};
use pretty_assertions::assert_eq;

#[test]
fn sample_rows_stay_inside_the_generated_window() {
    let start: YearMonth = "2025-11".parse().unwrap();
    let window = calendar::sequence("2025-11", SAMPLE_MONTHS).unwrap();
    let portfolio = sample_portfolio(start);

    for record in &portfolio.allocations {
        let month = record.year_month().unwrap();
        assert!(window.contains(&month), "{month} outside window");
        assert!(record.phase.is_some());
    }
    assert_eq!(portfolio.departments(), vec!["DIGITAL", "PMO", "SCI & ENG"]);
    assert!(portfolio.duplicate_projects().is_empty());
}

#[test]
fn different_seeds_give_different_portfolios() {
    let start: YearMonth = "2025-01".parse().unwrap();
    assert_ne!(
        sample_portfolio_with_seed(start, 1).allocations,
        sample_portfolio_with_seed(start, 2).allocations
    );
}

#[test]
fn records_serialize_with_sheet_headers() {
    let record = AllocationRecord::new("THESEUS", "2025-05", 8.0).employees("Dr. Sarah Chen (4.0)");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["Project"], "THESEUS");
    assert_eq!(json["Date"], "2025-05");
    assert_eq!(json["MM"], 8.0);
    assert!(json["Phase"].is_null());
}

#[test]
fn department_filter_from_selector() {
    let portfolio = sample_portfolio("2025-01".parse().unwrap());
    let pmo = portfolio.projects_in(&DepartmentFilter::from_option(Some("PMO")));
    assert!(pmo.iter().all(|p| p.department == "PMO"));
    assert_eq!(
        portfolio.projects_in(&DepartmentFilter::from_option(Some("All"))).len(),
        portfolio.projects.len()
    );
}

#[test]
fn settings_start_feeds_calendar() {
    let settings: Settings = toml::from_str("[timeline]\nstart = \"2025-12\"\n").unwrap();
    let months: Vec<String> = settings
        .start()
        .months(settings.timeline.heatmap_months)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(months, vec!["2025-12", "2026-01", "2026-02"]);
}
