//! Locate the transaction table inside a statement sheet.
//!
//! Expected layout (row numbers vary with the preamble):
//!   Histórico de Despesas
//!   Despesas no Brasil
//!   Data | Descrição | Parcela | Valor (R$)
//!   10/03/2024 | MERCADO | | 150,00
//!   ...
//!   Valor Total R$ | ... | 195,30

use fatura_core::{Cell, DataBlock, FaturaError, Grid, Result};
use tracing::warn;

use crate::types::{Extraction, Layout};

/// First row at or after `from` with a text cell satisfying `pred`.
fn find_row(grid: &Grid, from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    grid.rows()
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, row)| row.iter().filter_map(Cell::as_text).any(&pred))
        .map(|(i, _)| i)
}

/// Extract the table using the default export layout.
pub fn extract(grid: &Grid) -> Result<Extraction> {
    extract_with(grid, &Layout::default())
}

/// Extract the table between the header marker and the summary marker.
///
/// A missing header marker is fatal. A missing summary marker is not: the
/// table then runs to the last row of the grid.
pub fn extract_with(grid: &Grid, layout: &Layout) -> Result<Extraction> {
    let marker_row = find_row(grid, 0, |text| text.contains(&layout.header_marker)).ok_or_else(
        || FaturaError::MarkerNotFound {
            marker: layout.header_marker.clone(),
        },
    )?;

    let header_row = marker_row + layout.header_skip;
    let header = grid
        .row(header_row)
        .ok_or(FaturaError::HeaderRowMissing { row: header_row })?;

    let summary_row = find_row(grid, header_row, |text| {
        text.trim().contains(&layout.summary_marker)
    });

    let end = match summary_row {
        Some(row) => row.max(header_row + 1),
        None => {
            warn!(
                marker = %layout.summary_marker,
                rows = grid.len() - header_row - 1,
                "summary marker not found; using the rest of the sheet as data"
            );
            grid.len()
        }
    };

    let block = DataBlock::from_header(header, &grid.rows()[header_row + 1..end]);

    Ok(Extraction {
        block,
        marker_row,
        header_row,
        summary_row,
    })
}
