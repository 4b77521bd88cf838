//! Statement file readers.

pub mod workbook;

pub use workbook::{is_supported, read_first_sheet};
