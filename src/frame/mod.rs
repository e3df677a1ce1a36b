//! Minimal column-oriented table used by the profiling and preparation stages.
//!
//! Column names are not required to be unique: repeated headers are a finding
//! reported by the dataset descriptor, not a load failure.

pub mod column;
pub mod csv_io;

pub use column::{parse_datetime, Column, ColumnData, Scalar};
pub use csv_io::{read_csv, write_csv, CsvOptions};

use crate::schema::enums::Dtype;
use crate::utils::error::{AutoMlError, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(AutoMlError::processing(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    /// True when there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_cols() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn dtypes(&self) -> Vec<Dtype> {
        self.columns.iter().map(Column::dtype).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// First column carrying `name`.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(AutoMlError::processing(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.n_rows()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Names from `names` that no column carries, in request order.
    pub fn missing_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n: &&str| !self.has_column(n) && seen.insert(n.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Columns in the requested order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        let missing = self.missing_columns(names);
        if !missing.is_empty() {
            return Err(AutoMlError::column_not_found(missing));
        }
        let columns = names
            .iter()
            .filter_map(|n| self.column(n.as_ref()).cloned())
            .collect();
        Ok(Self { columns })
    }

    /// Removes every column carrying one of `names`.
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        let missing = self.missing_columns(names);
        if !missing.is_empty() {
            return Err(AutoMlError::column_not_found(missing));
        }
        let columns = self
            .columns
            .iter()
            .filter(|c| !names.iter().any(|n| n.as_ref() == c.name))
            .cloned()
            .collect();
        Ok(Self { columns })
    }

    /// Keeps columns whose dtype is in `include` (every dtype when empty) and not in `exclude`.
    pub fn select_dtypes(&self, include: &[Dtype], exclude: &[Dtype]) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .filter(|c| include.is_empty() || include.contains(&c.dtype()))
            .filter(|c| !exclude.contains(&c.dtype()))
            .cloned()
            .collect();
        Self { columns }
    }

    /// Rows at `indices`, in order; indices may repeat.
    pub fn take_rows(&self, indices: &[usize]) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
            .collect();
        Self { columns }
    }

    pub fn retain_columns<F: FnMut(usize, &Column) -> bool>(&mut self, mut keep: F) {
        let mut idx = 0;
        self.columns.retain(|c| {
            let kept = keep(idx, c);
            idx += 1;
            kept
        });
    }

    pub fn row_has_null(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.data.is_null(row))
    }

    pub fn row_key(&self, row: usize) -> String {
        self.columns
            .iter()
            .map(|c| c.data.cell_key(row))
            .collect::<Vec<_>>()
            .join("\u{1f}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::integer("id", vec![Some(1), Some(2), Some(3)]),
            Column::float("price", vec![Some(1.5), None, Some(3.0)]),
            Column::categorical("city", vec![Some("Oslo"), Some("Rome"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = DataFrame::new(vec![
            Column::integer("a", vec![Some(1)]),
            Column::integer("b", vec![Some(1), Some(2)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let frame = sample().select(&["city", "id"]).unwrap();
        assert_eq!(frame.column_names(), vec!["city", "id"]);
        assert_eq!(frame.n_rows(), 3);
    }

    #[test]
    fn test_drop_reports_missing_columns() {
        let err = sample().drop_columns(&["id", "nope", "gone"]).unwrap_err();
        match err {
            AutoMlError::ColumnNotFound { columns } => assert_eq!(columns, vec!["nope", "gone"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_select_dtypes_include_and_exclude() {
        let frame = sample();
        let numeric = frame.select_dtypes(&[Dtype::Integer, Dtype::Float], &[]);
        assert_eq!(numeric.column_names(), vec!["id", "price"]);
        let no_float = frame.select_dtypes(&[], &[Dtype::Float]);
        assert_eq!(no_float.column_names(), vec!["id", "city"]);
    }

    #[test]
    fn test_take_rows_allows_repeats() {
        let frame = sample().take_rows(&[2, 0, 2]);
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.row_key(0), frame.row_key(2));
        assert_ne!(frame.row_key(0), frame.row_key(1));
    }

    #[test]
    fn test_row_key_distinguishes_types() {
        let frame = DataFrame::new(vec![
            Column::integer("a", vec![Some(1)]),
            Column::categorical("b", vec![Some("1")]),
        ])
        .unwrap();
        let swapped = DataFrame::new(vec![
            Column::categorical("a", vec![Some("1")]),
            Column::integer("b", vec![Some(1)]),
        ])
        .unwrap();
        assert_ne!(frame.row_key(0), swapped.row_key(0));
    }
}
