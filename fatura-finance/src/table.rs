//! The finished statement table and typed row views over it.

use fatura_core::{Category, Cell, DataBlock, Labels};

use crate::amount::format_brl;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    block: DataBlock,
    labels: Labels,
}

impl NormalizedTable {
    pub fn new(block: DataBlock, labels: Labels) -> Self {
        Self { block, labels }
    }

    pub fn columns(&self) -> &[String] {
        self.block.columns()
    }

    pub fn len(&self) -> usize {
        self.block.row_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn block(&self) -> &DataBlock {
        &self.block
    }

    pub fn rows(&self) -> impl Iterator<Item = NormalizedRow<'_>> {
        self.block.rows().iter().map(|cells| NormalizedRow {
            columns: self.block.columns(),
            cells,
            labels: &self.labels,
        })
    }

    /// Sum of all parsed amounts.
    pub fn total(&self) -> f64 {
        self.rows().filter_map(|r| r.amount()).sum()
    }

    /// One-line summary for logs: `12 rows, total R$ 1.234,56`.
    pub fn summary(&self) -> String {
        format!("{} rows, total {}", self.len(), format_brl(self.total()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizedRow<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
    labels: &'a Labels,
}

impl<'a> NormalizedRow<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.cells.get(idx)
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    pub fn category(&self) -> Option<Category> {
        let text = self.get(&self.labels.category)?.as_text()?;
        Category::from_label(text, self.labels.locale)
    }

    pub fn paid(&self) -> bool {
        self.get(&self.labels.paid)
            .and_then(Cell::as_text)
            .is_some_and(|v| v == self.labels.paid_marker)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.get(&self.labels.description)?.as_text()
    }

    pub fn date(&self) -> Option<&'a str> {
        self.get(&self.labels.date)?.as_text()
    }

    pub fn amount(&self) -> Option<f64> {
        self.get(&self.labels.amount)?.as_number()
    }
}
