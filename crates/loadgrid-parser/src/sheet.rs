//! Generic tabular sheets
//!
//! Both input formats are first flattened into a [`Sheet`]: a named list of
//! rows keyed by column header. Column presence is checked here, before any
//! row is converted into a domain record.

use std::collections::BTreeMap;

use crate::LoadError;

/// A single cell value
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Null or whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form of the cell; `None` for blank cells.
    ///
    /// Whole numbers print without a fractional part so that numeric
    /// project ids read back the way they were typed.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    /// Numeric form of the cell; numeric strings are accepted
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// One row, keyed by column header
pub type Row = BTreeMap<String, Cell>;

/// A named table of rows
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Column headers in first-seen order (union across rows)
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row, registering any new column headers
    pub fn push_row(&mut self, row: Row) {
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with every missing column named, before any conversion happens.
    ///
    /// A sheet without rows carries no headers (JSON has no header row) and
    /// is accepted as an empty record set.
    pub fn ensure_columns(&self, required: &[&str]) -> Result<(), LoadError> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let missing: Vec<String> = required
            .iter()
            .filter(|c| !self.has_column(c))
            .map(|c| (*c).to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoadError::MissingColumns {
                dataset: self.name.clone(),
                columns: missing,
            })
        }
    }

    /// Build from a JSON array of objects
    pub fn from_json(name: &str, value: &serde_json::Value) -> Result<Self, LoadError> {
        let items = value.as_array().ok_or_else(|| LoadError::Shape {
            dataset: name.to_string(),
            message: "expected an array of row objects".into(),
        })?;

        let mut sheet = Sheet::new(name);
        for (index, item) in items.iter().enumerate() {
            let object = item.as_object().ok_or_else(|| LoadError::Shape {
                dataset: name.to_string(),
                message: format!("row {} is not an object", index + 1),
            })?;
            let row = object
                .iter()
                .map(|(key, value)| (key.clone(), json_cell(value)))
                .collect();
            sheet.push_row(row);
        }
        Ok(sheet)
    }

    /// Build from a TOML array of tables
    pub fn from_toml(name: &str, value: &toml::Value) -> Result<Self, LoadError> {
        let items = value.as_array().ok_or_else(|| LoadError::Shape {
            dataset: name.to_string(),
            message: "expected an array of tables".into(),
        })?;

        let mut sheet = Sheet::new(name);
        for (index, item) in items.iter().enumerate() {
            let table = item.as_table().ok_or_else(|| LoadError::Shape {
                dataset: name.to_string(),
                message: format!("row {} is not a table", index + 1),
            })?;
            let row = table
                .iter()
                .map(|(key, value)| (key.clone(), toml_cell(value)))
                .collect();
            sheet.push_row(row);
        }
        Ok(sheet)
    }
}

fn json_cell(value: &serde_json::Value) -> Cell {
    use serde_json::Value;
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
        Value::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn toml_cell(value: &toml::Value) -> Cell {
    use toml::Value;
    match value {
        Value::String(s) => Cell::Text(s.clone()),
        Value::Integer(i) => Cell::Number(*i as f64),
        Value::Float(f) => Cell::Number(*f),
        Value::Boolean(b) => Cell::Bool(*b),
        Value::Datetime(dt) => Cell::Text(dt.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn columns_are_union_in_first_seen_order() {
        let sheet = Sheet::from_json(
            "Allocations",
            &json!([
                {"Project": "A", "Date": "2025-01"},
                {"Project": "B", "MM": 2, "Employees": "x (1)"}
            ]),
        )
        .unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert!(sheet.has_column("MM"));
        assert!(sheet.has_column("Employees"));
        assert_eq!(sheet.columns.len(), 4);
    }

    #[test]
    fn ensure_columns_names_every_missing_column() {
        let sheet = Sheet::from_json("Allocations", &json!([{"Project": "A", "Phase": "Design"}])).unwrap();
        let err = sheet.ensure_columns(&["Project", "Date", "Phase", "MM"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Allocations is missing required columns: Date, MM"
        );
    }

    #[test]
    fn empty_sheet_passes_column_check() {
        let sheet = Sheet::from_json("Meta", &json!([])).unwrap();
        assert!(sheet.columns.is_empty());
        assert!(sheet.ensure_columns(&["Project"]).is_ok());
    }

    #[test]
    fn rejects_non_array() {
        let err = Sheet::from_json("Meta", &json!({"Project": "A"})).unwrap_err();
        assert!(matches!(err, LoadError::Shape { .. }));
    }

    #[test]
    fn cell_conversions() {
        assert_eq!(Cell::Number(2024.0).as_text(), Some("2024".into()));
        assert_eq!(Cell::Number(2.5).as_text(), Some("2.5".into()));
        assert_eq!(Cell::Text("  ".into()).as_text(), None);
        assert_eq!(Cell::Text(" 3.5 ".into()).as_number(), Some(3.5));
        assert_eq!(Cell::Text("lots".into()).as_number(), None);
        assert!(Cell::Null.is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn toml_integers_become_numbers() {
        let value: toml::Value = toml::from_str(
            r#"
            [[rows]]
            Project = "A"
            MM = 3
            "#,
        )
        .unwrap();
        let sheet = Sheet::from_toml("Allocations", &value["rows"]).unwrap();
        assert_eq!(sheet.rows[0]["MM"], Cell::Number(3.0));
    }
}
