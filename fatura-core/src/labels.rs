//! Column names and fixed phrases of the statement export, per locale.

use serde::{Deserialize, Serialize};

use crate::finance::Locale;

/// Marker phrase on the row above the transaction table.
pub const HEADER_MARKER: &str = "Histórico de Despesas";
/// Marker phrase on the totals row below the transaction table.
pub const SUMMARY_MARKER: &str = "Valor Total";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub locale: Locale,
    pub date: String,
    pub description: String,
    pub installment: String,
    pub amount: String,
    pub category: String,
    pub paid: String,
    /// Value written to every row of the paid column.
    pub paid_marker: String,
    /// Tag put in front of rewritten installment descriptions.
    pub card_tag: String,
    /// Word used in the `(<word> N)` installment suffix.
    pub installment_word: String,
    /// Text after the opening brace of the purchase-date suffix.
    pub date_lead: String,
}

impl Labels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::PtBr => Self {
                locale,
                date: "Data".into(),
                description: "Descrição".into(),
                installment: "Parcela".into(),
                amount: "Valor (R$)".into(),
                category: "Categoria".into(),
                paid: "Pago".into(),
                paid_marker: "x".into(),
                card_tag: "[Cartão]".into(),
                installment_word: "Parcela".into(),
                date_lead: "em ".into(),
            },
            Locale::En => Self {
                locale,
                date: "Date".into(),
                description: "Description".into(),
                installment: "Installment".into(),
                amount: "Amount".into(),
                category: "Category".into(),
                paid: "Paid".into(),
                paid_marker: "x".into(),
                card_tag: "[Card]".into(),
                installment_word: "Installment".into(),
                date_lead: String::new(),
            },
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_per_locale() {
        let pt = Labels::for_locale(Locale::PtBr);
        assert_eq!(pt.amount, "Valor (R$)");
        assert_eq!(pt.card_tag, "[Cartão]");
        let en = Labels::for_locale(Locale::En);
        assert_eq!(en.description, "Description");
        assert!(en.date_lead.is_empty());
        assert_eq!(Labels::default(), pt);
    }
}
