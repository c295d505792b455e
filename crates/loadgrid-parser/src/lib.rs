//! # loadgrid-parser
//!
//! Loads portfolio record sheets into the loadgrid domain model.
//!
//! This crate provides:
//! - JSON row-array loading (the shape spreadsheet exports produce)
//! - Single-file TOML portfolios with `[[projects]]` and `[[allocations]]`
//! - Required-column validation that fails before any row is converted
//! - JSON writers producing files this crate can load again
//!
//! ## Example
//!
//! ```rust
//! use loadgrid_parser::parse_allocations_json;
//!
//! let input = r#"[
//!     {"Project": "ENERGIZE", "Date": "2025-02", "Phase": "Design", "MM": 3,
//!      "Employees": "Alex Morgan (1.5), Emma Thompson (1.5)"}
//! ]"#;
//!
//! let records = parse_allocations_json(input).unwrap();
//! assert_eq!(records[0].effort, 3.0);
//! ```

pub mod records;
pub mod sheet;

pub use records::{allocations_from_sheet, meta_from_sheet, ALLOCATION_COLUMNS, META_COLUMNS};
pub use sheet::{Cell, Sheet};

use std::path::{Path, PathBuf};

use loadgrid_core::{AllocationRecord, Portfolio, ProjectMeta};
use thiserror::Error;

/// Sheet name used in errors about project metadata
pub const META_SHEET: &str = "Meta";

/// Sheet name used in errors about allocations
pub const ALLOCATIONS_SHEET: &str = "Allocations";

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{dataset} is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        dataset: String,
        columns: Vec<String>,
    },

    #[error("{dataset} row {row}, column {column}: {message}")]
    InvalidValue {
        dataset: String,
        row: usize,
        column: String,
        message: String,
    },

    #[error("{dataset}: {message}")]
    Shape { dataset: String, message: String },
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// JSON array of row objects (or an object holding both sheets)
    Json,
    /// TOML document with `[[projects]]` / `[[allocations]]`
    Toml,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => FileFormat::Toml,
        _ => FileFormat::Json,
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse project metadata from a JSON row array
pub fn parse_meta_json(input: &str) -> Result<Vec<ProjectMeta>, LoadError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    meta_from_sheet(&Sheet::from_json(META_SHEET, &value)?)
}

/// Parse allocations from a JSON row array
pub fn parse_allocations_json(input: &str) -> Result<Vec<AllocationRecord>, LoadError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    allocations_from_sheet(&Sheet::from_json(ALLOCATIONS_SHEET, &value)?)
}

/// Parse a combined JSON portfolio: `{"projects": [...], "allocations": [...]}`
pub fn parse_portfolio_json(input: &str) -> Result<Portfolio, LoadError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    let section = |key: &str, dataset: &str| {
        value.get(key).ok_or_else(|| LoadError::Shape {
            dataset: dataset.to_string(),
            message: format!("missing \"{key}\" array"),
        })
    };
    let projects = meta_from_sheet(&Sheet::from_json(
        META_SHEET,
        section("projects", META_SHEET)?,
    )?)?;
    let allocations = allocations_from_sheet(&Sheet::from_json(
        ALLOCATIONS_SHEET,
        section("allocations", ALLOCATIONS_SHEET)?,
    )?)?;
    Ok(Portfolio::new(projects, allocations))
}

/// Parse a TOML portfolio with `[[projects]]` and `[[allocations]]` tables.
///
/// An absent `[[allocations]]` section means every project is idle.
pub fn parse_portfolio_toml(input: &str) -> Result<Portfolio, LoadError> {
    let value: toml::Value = toml::from_str(input)?;
    let projects = value.get("projects").ok_or_else(|| LoadError::Shape {
        dataset: META_SHEET.to_string(),
        message: "missing [[projects]] tables".into(),
    })?;
    let projects = meta_from_sheet(&Sheet::from_toml(META_SHEET, projects)?)?;

    let allocations = match value.get("allocations") {
        Some(rows) => allocations_from_sheet(&Sheet::from_toml(ALLOCATIONS_SHEET, rows)?)?,
        None => Vec::new(),
    };
    Ok(Portfolio::new(projects, allocations))
}

/// Load project metadata from a JSON file
pub fn load_meta(path: &Path) -> Result<Vec<ProjectMeta>, LoadError> {
    let projects = parse_meta_json(&read(path)?)?;
    tracing::debug!(path = %path.display(), rows = projects.len(), "loaded project metadata");
    Ok(projects)
}

/// Load allocations from a JSON file
pub fn load_allocations(path: &Path) -> Result<Vec<AllocationRecord>, LoadError> {
    let records = parse_allocations_json(&read(path)?)?;
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded allocations");
    Ok(records)
}

/// Load both sheets from separate JSON files
pub fn load_portfolio(meta_path: &Path, alloc_path: &Path) -> Result<Portfolio, LoadError> {
    Ok(Portfolio::new(load_meta(meta_path)?, load_allocations(alloc_path)?))
}

/// Load a combined portfolio file (auto-detects format)
pub fn load_portfolio_file(path: &Path) -> Result<Portfolio, LoadError> {
    let content = read(path)?;
    let portfolio = match detect_format(path) {
        FileFormat::Toml => parse_portfolio_toml(&content)?,
        FileFormat::Json => parse_portfolio_json(&content)?,
    };
    tracing::debug!(
        path = %path.display(),
        projects = portfolio.projects.len(),
        allocations = portfolio.allocations.len(),
        "loaded portfolio"
    );
    Ok(portfolio)
}

/// Write records as a pretty JSON row array
pub fn save_json<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<(), LoadError> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json + "\n").map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
