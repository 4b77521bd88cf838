//! Excel statement reader (`.xls` and `.xlsx`, first sheet only).

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::NaiveDate;
use fatura_core::{Cell, FaturaError, Grid, Result};

const EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// True when the file extension is one the reader understands (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Load the first sheet of a workbook as a grid.
pub fn read_first_sheet(path: &Path) -> Result<Grid> {
    if !is_supported(path) {
        return Err(FaturaError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let workbook_err = |e: calamine::Error| FaturaError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FaturaError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_err)?;

    Ok(range_to_grid(&range))
}

/// Rows keep their sheet positions: a range starting at C4 gets three blank
/// rows and two blank leading cells.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (top, left) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; left];
        cells.extend(row.iter().map(to_cell));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => Cell::from_date(ts.date()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::from_date)
            .unwrap_or_else(|| Cell::text(s.clone())),
        Data::DurationIso(s) => Cell::text(s.clone()),
    }
}
