//! Errors raised while turning one statement file into a clean table.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaturaError {
    /// No row carries the header marker phrase.
    #[error("header marker '{marker}' not found")]
    MarkerNotFound { marker: String },

    /// The marker was found but the column-header row lies past the end of the sheet.
    #[error("column header row {row} is past the end of the sheet")]
    HeaderRowMissing { row: usize },

    /// An amount cell could not be read as a number.
    #[error("row {row}: cannot parse amount '{value}'")]
    AmountParse { row: usize, value: String },

    #[error("unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook has no sheets: {path}")]
    EmptyWorkbook { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, FaturaError>;
