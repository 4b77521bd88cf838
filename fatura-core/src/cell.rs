//! Spreadsheet cell values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One value read from a spreadsheet grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Date cells are carried as day/month/year text, the way the export prints them.
    pub fn from_date(date: NaiveDate) -> Self {
        Cell::Text(date.format("%d/%m/%Y").to_string())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Compact rendering used inside generated text: integral numbers print
    /// without a fractional part (`2`, not `2.0`).
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// CSV rendering. Numbers always keep a fractional digit (`150.0`).
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{n:.1}")
            }
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() { Cell::Empty } else { Cell::Text(s) }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_fraction_digit() {
        assert_eq!(Cell::Number(150.0).to_string(), "150.0");
        assert_eq!(Cell::Number(45.3).to_string(), "45.3");
        assert_eq!(Cell::Number(-12.5).to_string(), "-12.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_label_is_compact() {
        assert_eq!(Cell::Number(2.0).label(), "2");
        assert_eq!(Cell::Number(2.5).label(), "2.5");
        assert_eq!(Cell::text("03/10").label(), "03/10");
    }

    #[test]
    fn test_empty_string_is_missing() {
        assert!(Cell::from("").is_missing());
        assert!(!Cell::from("  ").is_missing());
    }

    #[test]
    fn test_from_date() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(Cell::from_date(d), Cell::text("05/03/2024"));
    }
}
