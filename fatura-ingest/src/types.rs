use fatura_core::{DataBlock, HEADER_MARKER, SUMMARY_MARKER};
use serde::{Deserialize, Serialize};

/// Where the transaction table sits inside a statement sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Phrase on the row above the table (case-sensitive substring).
    pub header_marker: String,
    /// Phrase on the totals row that closes the table.
    pub summary_marker: String,
    /// Rows from the header marker down to the column-header row.
    pub header_skip: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            header_marker: HEADER_MARKER.to_string(),
            summary_marker: SUMMARY_MARKER.to_string(),
            header_skip: 2,
        }
    }
}

/// Result of locating the table in a grid. Row numbers are zero-based grid rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub block: DataBlock,
    pub marker_row: usize,
    pub header_row: usize,
    pub summary_row: Option<usize>,
}
