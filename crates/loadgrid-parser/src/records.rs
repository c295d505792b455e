//! Sheet to domain-record conversion
//!
//! Column names follow the spreadsheet headers. Required columns are checked
//! for the whole sheet first; individual cells are then converted row by row
//! and the first bad cell stops the load with its row and column named.

use loadgrid_core::{AllocationRecord, Phase, ProjectMeta, YearMonth};

use crate::sheet::{Cell, Row, Sheet};
use crate::LoadError;

/// Required columns of the project metadata sheet
pub const META_COLUMNS: [&str; 3] = ["Project", "Department", "Total_MM"];

/// Required columns of the allocations sheet
pub const ALLOCATION_COLUMNS: [&str; 4] = ["Project", "Date", "Phase", "MM"];

/// Optional annotation column; treated as empty when absent
pub const EMPLOYEES_COLUMN: &str = "Employees";

/// Convert a metadata sheet
pub fn meta_from_sheet(sheet: &Sheet) -> Result<Vec<ProjectMeta>, LoadError> {
    sheet.ensure_columns(&META_COLUMNS)?;
    sheet
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| -> Result<ProjectMeta, LoadError> {
            let cells = RowCells::new(sheet, index, row);
            Ok(ProjectMeta {
                project: cells.text("Project")?,
                department: cells.text("Department")?,
                total_budget: cells.amount("Total_MM")?,
            })
        })
        .collect()
}

/// Convert an allocations sheet
pub fn allocations_from_sheet(sheet: &Sheet) -> Result<Vec<AllocationRecord>, LoadError> {
    sheet.ensure_columns(&ALLOCATION_COLUMNS)?;
    sheet
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| -> Result<AllocationRecord, LoadError> {
            let cells = RowCells::new(sheet, index, row);
            Ok(AllocationRecord {
                project: cells.text("Project")?,
                month: canonical_month(cells.text("Date")?),
                phase: cells.optional_text("Phase").and_then(|p| Phase::parse(&p)),
                effort: cells.amount("MM")?,
                employees: cells.optional_text(EMPLOYEES_COLUMN),
            })
        })
        .collect()
}

/// Rewrite a parseable month token as `YYYY-MM`; anything else stays verbatim
fn canonical_month(token: String) -> String {
    token.parse::<YearMonth>().map_or(token, |month| month.to_string())
}

/// Cell accessors for one row, carrying enough context for error messages
struct RowCells<'a> {
    sheet: &'a Sheet,
    index: usize,
    row: &'a Row,
}

impl<'a> RowCells<'a> {
    fn new(sheet: &'a Sheet, index: usize, row: &'a Row) -> Self {
        Self { sheet, index, row }
    }

    fn cell(&self, column: &str) -> &Cell {
        self.row.get(column).unwrap_or(&Cell::Null)
    }

    fn invalid(&self, column: &str, message: impl Into<String>) -> LoadError {
        LoadError::InvalidValue {
            dataset: self.sheet.name.clone(),
            row: self.index + 1,
            column: column.to_string(),
            message: message.into(),
        }
    }

    fn text(&self, column: &str) -> Result<String, LoadError> {
        self.cell(column)
            .as_text()
            .ok_or_else(|| self.invalid(column, "value is required"))
    }

    fn optional_text(&self, column: &str) -> Option<String> {
        self.cell(column).as_text()
    }

    /// Non-negative, finite man-month amount
    fn amount(&self, column: &str) -> Result<f64, LoadError> {
        let cell = self.cell(column);
        if cell.is_blank() {
            return Err(self.invalid(column, "value is required"));
        }
        let value = cell
            .as_number()
            .ok_or_else(|| self.invalid(column, format!("{cell:?} is not a number")))?;
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(column, format!("{value} is not a non-negative amount")));
        }
        Ok(value)
    }
}
