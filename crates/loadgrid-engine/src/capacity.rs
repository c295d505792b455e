//! Portfolio capacity
//!
//! Demand is the summed effort of every allocation in a month, across all
//! projects and departments. Department filters used by the project views do
//! not apply here: capacity is a shared pool.

use std::fmt;

use loadgrid_core::{AllocationRecord, YearMonth};
use serde::Serialize;

/// Total effort booked in `month`
pub fn monthly_demand(records: &[AllocationRecord], month: YearMonth) -> f64 {
    let token = month.to_string();
    records
        .iter()
        .filter(|r| r.in_month(&token))
        .fold(0.0, |acc, r| acc + r.effort)
}

/// Capacity utilization band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityBand {
    /// Below 70%
    Comfortable,
    /// 70% up to (not including) 90%
    Tight,
    /// 90% and above
    Overloaded,
}

impl CapacityBand {
    pub fn classify(percent: f64) -> Self {
        if percent < 70.0 {
            CapacityBand::Comfortable
        } else if percent < 90.0 {
            CapacityBand::Tight
        } else {
            CapacityBand::Overloaded
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityBand::Comfortable => "comfortable",
            CapacityBand::Tight => "tight",
            CapacityBand::Overloaded => "overloaded",
        }
    }
}

impl fmt::Display for CapacityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demand against capacity for one month
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthCapacity {
    pub month: YearMonth,
    pub demand: f64,
    pub available: f64,
    pub percent: f64,
    pub band: CapacityBand,
}

/// Demand, utilization and band for each month in order
pub fn capacity_plan(
    records: &[AllocationRecord],
    months: &[YearMonth],
    available: f64,
) -> Vec<MonthCapacity> {
    months
        .iter()
        .map(|&month| {
            let demand = monthly_demand(records, month);
            let percent = demand / available * 100.0;
            MonthCapacity {
                month,
                demand,
                available,
                percent,
                band: CapacityBand::classify(percent),
            }
        })
        .collect()
}

/// Mean demand over the months in `months` that have any allocation.
///
/// Months with no rows at all are left out of the mean rather than counted as
/// zero. `None` when none of the months has rows.
pub fn average_monthly_demand(records: &[AllocationRecord], months: &[YearMonth]) -> Option<f64> {
    let mut total = 0.0;
    let mut counted = 0_u32;
    for month in months {
        let token = month.to_string();
        let mut rows = records.iter().filter(|r| r.in_month(&token)).peekable();
        if rows.peek().is_none() {
            continue;
        }
        total += rows.fold(0.0, |acc, r| acc + r.effort);
        counted += 1;
    }
    (counted > 0).then(|| total / f64::from(counted))
}
