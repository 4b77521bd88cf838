//! Find statement workbooks in an input folder.

use std::path::{Path, PathBuf};

use fatura_core::{FaturaError, Result};

use crate::readers::is_supported;

/// Lists `.xls`/`.xlsx` files directly inside `dir`, sorted by file name.
pub fn list_statement_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FaturaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input directory not found: {}", dir.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lists_only_workbooks_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.xlsx", "a.XLS", "notes.txt", "c.csv"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        let files = list_statement_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.XLS", "b.xlsx"]);
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(list_statement_files(&dir.path().join("nope")).is_err());
    }
}
