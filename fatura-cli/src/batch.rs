//! Convert every statement in the input folder, one file at a time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fatura_core::{Grid, Labels};
use fatura_finance::{Classifier, NormalizedTable, normalize, output_path_for, write_csv};
use fatura_ingest::{Layout, extract_with, list_statement_files, read_first_sheet};
use tracing::{error, info, info_span};

pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub layout: Layout,
    pub labels: Labels,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// (input, output, rows written)
    pub processed: Vec<(PathBuf, PathBuf, usize)>,
    /// (input, error message)
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}

/// Extract and normalize one grid.
pub fn convert_grid(
    grid: &Grid,
    opts: &BatchOptions,
    classifier: Option<&dyn Classifier>,
) -> fatura_core::Result<NormalizedTable> {
    let extraction = extract_with(grid, &opts.layout)?;
    normalize(extraction.block, classifier, opts.reference_date, &opts.labels)
}

/// Read, convert and write a single statement. Nothing is written on error.
pub fn process_file(
    path: &Path,
    opts: &BatchOptions,
    classifier: Option<&dyn Classifier>,
) -> Result<(PathBuf, NormalizedTable)> {
    let grid = read_first_sheet(path)?;
    let table = convert_grid(&grid, opts, classifier)?;
    let out = output_path_for(path, &opts.output_dir);
    write_csv(&table, &out)?;
    Ok((out, table))
}

/// Process every workbook in `opts.input_dir`.
///
/// A file that fails is logged and skipped; the rest of the batch still runs.
pub fn run_batch(opts: &BatchOptions, classifier: Option<&dyn Classifier>) -> Result<BatchReport> {
    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("create {}", opts.output_dir.display()))?;

    let files = list_statement_files(&opts.input_dir)
        .with_context(|| format!("list {}", opts.input_dir.display()))?;

    let mut report = BatchReport::default();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _span = info_span!("statement", file = %name).entered();

        match process_file(&path, opts, classifier) {
            Ok((out, table)) => {
                info!(output = %out.display(), "{}", table.summary());
                println!("Processed {} -> {}", name, out.display());
                report.processed.push((path, out, table.len()));
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "failed to process {}", name);
                report.failed.push((path, format!("{e:#}")));
            }
        }
    }

    Ok(report)
}
