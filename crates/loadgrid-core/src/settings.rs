//! Engine settings
//!
//! Thresholds and timeline defaults shared by every view. The CLI fills this
//! from `loadgrid.toml`; library callers can use [`Settings::default`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::YearMonth;

/// Effort units one person can carry in a month (one man-month per week,
/// four weeks)
pub const FULL_TIME_EFFORT: f64 = 4.0;

/// Total monthly throughput of all departments together
pub const AVAILABLE_CAPACITY: f64 = 40.0;

/// Complete settings document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub workload: WorkloadSettings,
    pub timeline: TimelineSettings,
}

/// Utilization thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadSettings {
    /// Per-employee monthly load counted as 100%
    pub full_time_effort: f64,
    /// Portfolio-wide monthly capacity
    pub available_capacity: f64,
}

impl Default for WorkloadSettings {
    fn default() -> Self {
        Self {
            full_time_effort: FULL_TIME_EFFORT,
            available_capacity: AVAILABLE_CAPACITY,
        }
    }
}

/// Which months the views cover
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// First month shown; the current month when unset
    pub start: Option<YearMonth>,
    /// Months in the yearly timeline and utilization grid
    pub horizon_months: usize,
    /// Months in the capacity plan
    pub capacity_months: usize,
    /// Months in the heat map (focus month plus look-ahead)
    pub heatmap_months: usize,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            start: None,
            horizon_months: 12,
            capacity_months: 6,
            heatmap_months: 3,
        }
    }
}

/// Invalid settings value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

impl Settings {
    /// Start month, falling back to the current month
    pub fn start(&self) -> YearMonth {
        self.timeline.start.unwrap_or_else(YearMonth::current)
    }

    /// Both thresholds are divisors, so they must be finite and positive
    pub fn validate(&self) -> Result<(), SettingsError> {
        let checks = [
            ("workload.full_time_effort", self.workload.full_time_effort),
            ("workload.available_capacity", self.workload.available_capacity),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}
