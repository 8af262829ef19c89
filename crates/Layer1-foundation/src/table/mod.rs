//! Table - the cached value type
//!
//! A rectangular dataset: ordered columns, ordered rows, scalar cells.
//! Column order and row order are part of the value and survive the
//! [`codec`] round trip unchanged.
//!
//! - `codec`: blob encode/decode (`DecodeResult` for soft failures)
//! - `render`: tab-separated rendering for tool output

pub mod codec;
mod render;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub use codec::{decode, encode, DecodeResult, TABLE_FORMAT};

// ============================================================================
// Cell
// ============================================================================

/// A single scalar value
///
/// Missing values are `Null`. Floats are always finite; non-finite inputs
/// become `Null` on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view (ints widen to f64)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Infer a scalar from provider text.
    ///
    /// Empty → `Null`, integer → `Int`, decimal → `Float`, anything else
    /// stays `Text`. Words like `nan` or `inf` are kept as text.
    pub fn parse_scalar(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }

        let numeric_shape = trimmed.chars().any(|c| c.is_ascii_digit())
            && trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));

        if numeric_shape {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Cell::Int(i);
            }
            if let Ok(f) = trimmed.parse::<f64>() {
                return Cell::from(f);
            }
        }

        Cell::Text(trimmed.to_string())
    }

    /// Total order used for sorting and grouping: Null < Bool < number < Text
    pub fn total_cmp(&self, other: &Cell) -> Ordering {
        fn rank(cell: &Cell) -> u8 {
            match cell {
                Cell::Null => 0,
                Cell::Bool(_) => 1,
                Cell::Int(_) | Cell::Float(_) => 2,
                Cell::Text(_) => 3,
            }
        }

        match (self, other) {
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => rank(a).cmp(&rank(b)),
            },
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Cell::Float(value)
        } else {
            Cell::Null
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

// ============================================================================
// Table
// ============================================================================

/// Rectangular, ordered dataset
///
/// An empty table (no rows) is a real value: it records that the upstream
/// had nothing for the request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Table with the given columns and no rows
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Table with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from columns and row-major data; every row must match the column count
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Cell>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build from records that may each name a different subset of columns.
    ///
    /// Columns appear in first-seen order; absent values are `Null`.
    pub fn from_records<R, K>(records: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = (K, Cell)>,
        K: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut sparse: Vec<Vec<(usize, Cell)>> = Vec::new();

        for record in records {
            let mut row = Vec::new();
            for (key, value) in record {
                let key = key.into();
                let idx = match columns.iter().position(|c| *c == key) {
                    Some(idx) => idx,
                    None => {
                        columns.push(key);
                        columns.len() - 1
                    }
                };
                row.push((idx, value));
            }
            sparse.push(row);
        }

        let width = columns.len();
        let rows = sparse
            .into_iter()
            .map(|entries| {
                let mut row = vec![Cell::Null; width];
                for (idx, value) in entries {
                    row[idx] = value;
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Append a row; its width must equal the column count
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::InvalidInput(format!(
                "row has {} cells but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// New table with the rows for which `keep` returns true
    pub fn filter_rows(&self, mut keep: impl FnMut(&[Cell]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Rewrite every value of column `name`; returns false if the column is absent
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&Cell) -> Cell) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Projection onto `names`, in that order; unknown names are skipped
    pub fn select(&self, names: &[&str]) -> Table {
        let picked: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|n| self.column_index(n).map(|i| (i, *n)))
            .collect();

        Table {
            columns: picked.iter().map(|(_, n)| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| picked.iter().map(|(i, _)| r[*i].clone()).collect())
                .collect(),
        }
    }

    /// Set column `name` to `value` on every row, appending it if absent
    pub fn with_column(mut self, name: impl Into<String>, value: Cell) -> Table {
        let name = name.into();
        match self.column_index(&name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name);
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
        self
    }

    /// Stack tables vertically over the union of their columns
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let tables: Vec<Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for col in &table.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let mapping: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in table.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|m| m.map(|i| row[i].clone()).unwrap_or(Cell::Null))
                        .collect(),
                );
            }
        }

        Table { columns, rows }
    }

    /// Stable sort, largest first; no-op if the column is absent
    pub fn sort_by_column_desc(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            self.rows.sort_by(|a, b| b[idx].total_cmp(&a[idx]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_unions_columns_in_first_seen_order() {
        let table = Table::from_records(vec![
            vec![("Name", Cell::from("A")), ("HR", Cell::from(3))],
            vec![("Name", Cell::from("B")), ("AVG", Cell::from(0.25))],
        ]);

        assert_eq!(table.columns(), &["Name", "HR", "AVG"]);
        assert_eq!(table.cell(0, "AVG"), Some(&Cell::Null));
        assert_eq!(table.cell(1, "HR"), Some(&Cell::Null));
        assert_eq!(table.cell(1, "AVG"), Some(&Cell::Float(0.25)));
    }

    #[test]
    fn test_push_row_rejects_ragged_row() {
        let mut table = Table::new(["A", "B"]);
        assert!(table.push_row(vec![Cell::from(1)]).is_err());
        assert!(table.push_row(vec![Cell::from(1), Cell::Null]).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(Cell::parse_scalar(""), Cell::Null);
        assert_eq!(Cell::parse_scalar("42"), Cell::Int(42));
        assert_eq!(Cell::parse_scalar(".300"), Cell::Float(0.3));
        assert_eq!(Cell::parse_scalar("-1.5"), Cell::Float(-1.5));
        assert_eq!(Cell::parse_scalar("nan"), Cell::Text("nan".to_string()));
        assert_eq!(Cell::parse_scalar("FF"), Cell::Text("FF".to_string()));
        assert_eq!(Cell::parse_scalar("2024-04-01"), Cell::Text("2024-04-01".to_string()));
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(Cell::from(f64::NAN), Cell::Null);
        assert_eq!(Cell::from(f64::INFINITY), Cell::Null);
    }

    #[test]
    fn test_concat_fills_missing_with_null() {
        let a = Table::from_rows(["Tm", "W"], vec![vec![Cell::from("NYY"), Cell::from(90)]]).unwrap();
        let b = Table::from_rows(["Tm", "L"], vec![vec![Cell::from("BOS"), Cell::from(80)]]).unwrap();

        let combined = Table::concat(vec![a, b]);
        assert_eq!(combined.columns(), &["Tm", "W", "L"]);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.cell(1, "W"), Some(&Cell::Null));
        assert_eq!(combined.cell(1, "L"), Some(&Cell::Int(80)));
    }

    #[test]
    fn test_select_and_sort() {
        let mut table = Table::from_rows(
            ["Player", "HR", "AVG"],
            vec![
                vec![Cell::from("A"), Cell::from(10), Cell::from(0.2)],
                vec![Cell::from("B"), Cell::from(30), Cell::from(0.3)],
            ],
        )
        .unwrap();

        table.sort_by_column_desc("HR");
        let projected = table.select(&["Player", "HR", "missing"]);
        assert_eq!(projected.columns(), &["Player", "HR"]);
        assert_eq!(projected.cell(0, "Player"), Some(&Cell::from("B")));
    }

    #[test]
    fn test_with_column_appends_constant() {
        let table = Table::from_rows(["Tm"], vec![vec![Cell::from("ATL")]])
            .unwrap()
            .with_column("Division", Cell::from("NL East"));
        assert_eq!(table.cell(0, "Division"), Some(&Cell::from("NL East")));
    }
}
