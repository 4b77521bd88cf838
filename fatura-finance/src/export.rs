//! CSV output: UTF-8, comma-separated, header row, no index column.

use std::io::Write;
use std::path::{Path, PathBuf};

use fatura_core::{FaturaError, Result};

use crate::table::NormalizedTable;

/// `<output_dir>/<input stem>.csv`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    output_dir.join(format!("{stem}.csv"))
}

pub fn write_csv_to<W: Write>(table: &NormalizedTable, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.cells().iter().map(|c| c.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the table to `path`, replacing any previous file.
pub fn write_csv(table: &NormalizedTable, path: &Path) -> Result<()> {
    let write_err = |message: String| FaturaError::Write {
        path: path.to_path_buf(),
        message,
    };
    let file = std::fs::File::create(path).map_err(|e| write_err(e.to_string()))?;
    write_csv_to(table, std::io::BufWriter::new(file)).map_err(|e| write_err(e.to_string()))
}
