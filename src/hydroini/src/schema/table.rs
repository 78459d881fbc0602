// hydroini/src/schema/table.rs

//! Trailing table data of a typed record.

use crate::error::{IniError, Result};
use crate::field_types::{format_float, parse_float};

/// One table token: its text and, when it reads as a number, its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub number: Option<f64>,
}

impl Cell {
    pub fn new<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        let number = parse_float(&text);
        Self { text, number }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self {
            text: format_float(value),
            number: Some(value),
        }
    }
}

/// Rectangular table of cells, e.g. a time series or a list of harmonic
/// components (`M2  1.0  0.0`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    rows: Vec<Vec<Cell>>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw row tokens.
    pub fn from_rows(rows: &[Vec<String>]) -> Result<Self> {
        let mut table = Self::new();
        for row in rows {
            table.push_cells(row.iter().map(Cell::new).collect())?;
        }
        Ok(table)
    }

    /// Build a table from numbers.
    pub fn from_numeric(rows: Vec<Vec<f64>>) -> Result<Self> {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<()> {
        self.push_cells(row.into_iter().map(Cell::from).collect())
    }

    pub fn push_cells(&mut self, row: Vec<Cell>) -> Result<()> {
        if let Some(columns) = self.column_count() {
            if row.len() != columns {
                return Err(IniError::format_error(
                    format!(
                        "inconsistent table width: expected {} values, got {}",
                        columns,
                        row.len()
                    ),
                    0,
                ));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, `None` for an empty table.
    pub fn column_count(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells as numbers. Fails on the first non-numeric cell.
    pub fn to_numeric(&self) -> Result<Vec<Vec<f64>>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .map(|cell| {
                        cell.number.ok_or_else(|| {
                            IniError::type_coercion(
                                format!("row {}", i + 1),
                                cell.text.clone(),
                                "float".to_string(),
                            )
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// One column as numbers, one per row. `None` if the column does not
    /// exist or any of its cells is text.
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.column_count()? {
            return None;
        }
        self.rows
            .iter()
            .map(|row| row.get(index).and_then(|cell| cell.number))
            .collect()
    }

    /// Cell texts in row-major order.
    pub fn to_raw_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.text.clone()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_numeric_table() {
        let table = DataTable::from_rows(&raw(&[&["0.0", "1.23"], &["60.0", "2.34"]])).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), Some(2));
        assert_eq!(
            table.to_numeric().unwrap(),
            vec![vec![0.0, 1.23], vec![60.0, 2.34]]
        );
        assert_eq!(table.column(1), Some(vec![1.23, 2.34]));
    }

    #[test]
    fn test_mixed_table_keeps_text() {
        let table = DataTable::from_rows(&raw(&[&["M2", "1.0", "0.0"], &["S2", "0.5", "90.0"]]))
            .unwrap();
        assert_eq!(table.rows()[0][0].number, None);
        assert_eq!(table.rows()[0][1].number, Some(1.0));
        assert_eq!(table.column(0), None);
        let err = table.to_numeric().unwrap_err();
        assert_eq!(err.context().field.as_deref(), Some("row 1"));
        assert_eq!(table.to_raw_rows()[1], vec!["S2", "0.5", "90.0"]);
    }

    #[test]
    fn test_from_numeric_checks_width() {
        assert!(DataTable::from_numeric(vec![vec![0.0, 1.0], vec![2.0]]).is_err());
        let table = DataTable::from_numeric(vec![vec![60.0, 2.5]]).unwrap();
        assert_eq!(table.to_raw_rows(), vec![vec!["60.0", "2.5"]]);
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let table = DataTable::from_rows(&raw(&[&["1.0e+01", "2"]])).unwrap();
        assert_eq!(table.to_raw_rows(), vec![vec!["1.0e+01", "2"]]);
        assert_eq!(table.to_numeric().unwrap(), vec![vec![10.0, 2.0]]);
    }

    #[test]
    fn test_column_out_of_range() {
        assert_eq!(DataTable::new().column(0), None);
        let table = DataTable::from_numeric(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(table.column(0), Some(vec![0.0, 2.0]));
        assert_eq!(table.column(2), None);
    }
}
