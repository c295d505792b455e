//! # loadgrid-engine
//!
//! Aggregation over portfolio allocation records.
//!
//! This crate provides:
//! - Dominant-phase lookup per project and month
//! - Employee annotation parsing and per-employee monthly load
//! - Overallocation detection and utilization bands
//! - Portfolio capacity demand and bands
//! - Bulk month shifting and the read-only dashboard views
//!
//! Every query recomputes from the records it is given; nothing is cached.
//!
//! ## Example
//!
//! ```rust
//! use loadgrid_core::AllocationRecord;
//! use loadgrid_engine::{aggregate, detect_conflicts};
//!
//! let records = vec![
//!     AllocationRecord::new("ENERGIZE", "2025-03", 3.0).employees("Ann (3.0)"),
//!     AllocationRecord::new("THESEUS", "2025-03", 2.0).employees("Ann (2.0)"),
//! ];
//! let conflicts = detect_conflicts(&aggregate(&records));
//! assert_eq!(conflicts[0].summary(), "Ann is allocated 125% in 2025-03 (ENERGIZE + THESEUS)");
//! ```

pub mod capacity;
pub mod conflicts;
pub mod dashboard;
pub mod employees;
pub mod index;
pub mod shift;

pub use capacity::{average_monthly_demand, capacity_plan, monthly_demand, CapacityBand, MonthCapacity};
pub use conflicts::{detect_conflicts, detect_conflicts_with, Conflict, UtilizationBand};
pub use dashboard::{
    department_budgets, demand_trend, heatmap, kpis, timeline, utilization_grid, HeatmapRow, Kpis,
    UtilizationCell, UtilizationRow,
};
pub use employees::{
    aggregate, aggregate_par, aggregate_par_chunked, parse_employee_annotation, EmployeeLoads,
    EmployeeMonthLoad,
};
pub use index::{dominant_phase, effort_and_phase_and_employees, CellSummary};
pub use shift::{shift_records, RecordFilter, ShiftReport};
