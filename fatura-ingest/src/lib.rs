//! fatura-ingest: statement workbook loading and transaction-table extraction.

pub mod discovery;
pub mod extract;
pub mod readers;
pub mod types;

pub use discovery::list_statement_files;
pub use extract::{extract, extract_with};
pub use readers::read_first_sheet;
pub use types::{Extraction, Layout};
