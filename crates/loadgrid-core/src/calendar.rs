//! Year-month calendar arithmetic
//!
//! Allocation data is bucketed by calendar month and exchanged as `YYYY-MM`
//! tokens (zero-padded, four-digit year). This module provides the parsed
//! [`YearMonth`] value plus the two token-level operations the rest of the
//! workspace relies on:
//!
//! - [`sequence`]: consecutive months starting from a token
//! - [`shift`]: move a token forward or backward by a number of months
//!
//! ## Example
//!
//! ```rust
//! use loadgrid_core::calendar::{sequence, shift};
//!
//! let months: Vec<String> = sequence("2025-11", 3)
//!     .unwrap()
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//! assert_eq!(months, ["2025-11", "2025-12", "2026-01"]);
//!
//! assert_eq!(shift("2025-01", -1).unwrap(), "2024-12");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FormatError;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, ordered chronologically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year-month, rejecting months outside `1..=12`
    pub fn new(year: i32, month: u32) -> Result<Self, FormatError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(FormatError::MonthOutOfRange {
                token: format!("{year:04}-{month:02}"),
                month,
            })
        }
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 = January
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Three-letter English month name
    pub fn month_label(&self) -> &'static str {
        MONTH_LABELS[(self.month - 1) as usize]
    }

    /// Move by `delta` months with year rollover in both directions.
    ///
    /// Returns `None` only when the resulting year leaves the `i32` range.
    pub fn checked_shift(self, delta: i32) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(delta);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = index.rem_euclid(12) as u32 + 1;
        Some(Self { year, month })
    }

    /// The following month
    pub fn next(self) -> Option<Self> {
        self.checked_shift(1)
    }

    /// The preceding month
    pub fn prev(self) -> Option<Self> {
        self.checked_shift(-1)
    }

    /// `count` consecutive months starting with (and including) `self`.
    ///
    /// The sequence stops early only if it would run past the last
    /// representable year.
    pub fn months(self, count: usize) -> Vec<YearMonth> {
        std::iter::successors(Some(self), |ym| ym.next())
            .take(count)
            .collect()
    }

    /// Current month in local time
    pub fn current() -> Self {
        use chrono::Datelike;
        let today = chrono::Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| FormatError::MonthOutOfRange {
            token: s.to_string(),
            month,
        })
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse `start` and produce `count` consecutive months.
///
/// An unparseable start token is fatal: there is nothing to anchor the
/// sequence on. `count == 0` yields an empty vector.
pub fn sequence(start: &str, count: usize) -> Result<Vec<YearMonth>, FormatError> {
    let start: YearMonth = start.parse()?;
    Ok(start.months(count))
}

/// Shift a `YYYY-MM` token by `delta` months and return the new token.
///
/// Callers shifting many records should treat an `Err` as "leave this
/// record alone" rather than aborting; see `loadgrid_engine::shift`.
pub fn shift(token: &str, delta: i32) -> Result<String, FormatError> {
    let ym: YearMonth = token.parse()?;
    ym.checked_shift(delta)
        .map(|shifted| shifted.to_string())
        .ok_or_else(|| FormatError::YearOutOfRange {
            token: token.to_string(),
            delta,
        })
}
