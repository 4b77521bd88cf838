//! Brazilian currency amounts: `R$ 1.234,56` -> 1234.56

use std::sync::OnceLock;

use fatura_core::Cell;
use regex::Regex;

fn non_numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\d,.\-]").expect("invalid amount regex"))
}

/// Parse a comma-decimal amount.
///
/// Everything except digits, `,`, `.` and `-` is dropped, periods are treated
/// as thousands separators and the comma becomes the decimal point.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let kept = non_numeric_re().replace_all(raw, "");
    let normalized = kept.replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numbers pass through untouched; text goes through [`parse_amount`].
pub fn parse_amount_cell(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Number(_) | Cell::Empty => None,
        Cell::Text(s) => parse_amount(s),
    }
}

/// Render an amount the way the statement prints it (`R$ -1.234,56`).
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let int = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbol_and_thousands() {
        assert_eq!(parse_amount("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("150,00"), Some(150.0));
        assert_eq!(parse_amount("45,30"), Some(45.3));
        assert_eq!(parse_amount("1.000.000,01"), Some(1000000.01));
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(parse_amount("-89,90"), Some(-89.9));
        assert_eq!(parse_amount("R$ -1.500,00"), Some(-1500.0));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("R$"), None);
        assert_eq!(parse_amount("1,2,3"), None);
        assert_eq!(parse_amount("--5"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_cells() {
        assert_eq!(parse_amount_cell(&Cell::Number(12.5)), Some(12.5));
        assert_eq!(parse_amount_cell(&Cell::text("12,50")), Some(12.5));
        assert_eq!(parse_amount_cell(&Cell::Empty), None);
        assert_eq!(parse_amount_cell(&Cell::Number(f64::NAN)), None);
    }

    #[test]
    fn test_parse_is_idempotent_on_output() {
        for raw in ["R$ 1.234,56", "-0,99", "45,30", "150,00", "R$ 98.765.432,10"] {
            let once = parse_amount(raw).unwrap();
            assert_eq!(parse_amount_cell(&Cell::Number(once)), Some(once));
            assert_eq!(parse_amount(&format_brl(once)), Some(once));
        }
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(-45.3), "R$ -45,30");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(100.0), "R$ 100,00");
        assert_eq!(format_brl(1000000.0), "R$ 1.000.000,00");
    }
}
