//! Raw sheet grids and the named-column blocks cut out of them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cell::Cell;

/// Rows of cells exactly as they came out of the first sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string literals; `""` becomes an empty cell.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(|c| Cell::from(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A rectangular table with unique column names.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl DataBlock {
    /// Promote `header` to column names and square the data rows against it.
    pub fn from_header(header: &[Cell], data: &[Vec<Cell>]) -> Self {
        let columns = unique_column_names(header);
        let width = columns.len();
        let rows = data
            .iter()
            .map(|r| {
                let mut row: Vec<Cell> = r.iter().take(width).cloned().collect();
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<Cell>] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Value of `name` in row `row`, if both exist.
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.position(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Insert a column at `at` with every row set to `fill`.
    /// Returns false (and does nothing) if the name is already taken.
    pub fn insert_column(&mut self, at: usize, name: &str, fill: Cell) -> bool {
        if self.has_column(name) {
            return false;
        }
        let at = at.min(self.columns.len());
        self.columns.insert(at, name.to_string());
        for row in &mut self.rows {
            row.insert(at, fill.clone());
        }
        true
    }

    /// Append a column, or overwrite it in place when it already exists.
    pub fn set_column(&mut self, name: &str, fill: Cell) {
        match self.position(name) {
            Some(col) => {
                for row in &mut self.rows {
                    row[col] = fill.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(fill.clone());
                }
            }
        }
    }

    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(col) = self.position(name) else {
            return false;
        };
        self.columns.remove(col);
        for row in &mut self.rows {
            row.remove(col);
        }
        true
    }

    /// Mutable iterator over one column's cells, top to bottom.
    pub fn column_mut(&mut self, name: &str) -> Option<impl Iterator<Item = &mut Cell>> {
        let col = self.position(name)?;
        Some(self.rows.iter_mut().map(move |r| &mut r[col]))
    }

    /// Stable sort of the data rows.
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Vec<Cell>, &Vec<Cell>) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }
}

/// Header cells as names: blanks become `Unnamed: <i>`, repeats get `.1`, `.2`, ...
fn unique_column_names(header: &[Cell]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(header.len());

    for (i, cell) in header.iter().enumerate() {
        let base = match cell.label().trim() {
            "" => format!("Unnamed: {i}"),
            s => s.to_string(),
        };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }

    out
}
