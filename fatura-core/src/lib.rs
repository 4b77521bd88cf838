//! fatura-core: cells, grids, categories and errors shared by the statement pipeline

pub mod cell;
pub mod error;
pub mod finance;
pub mod grid;
pub mod labels;

pub use cell::Cell;
pub use error::{FaturaError, Result};
pub use finance::{Category, Locale};
pub use grid::{DataBlock, Grid};
pub use labels::{HEADER_MARKER, Labels, SUMMARY_MARKER};
