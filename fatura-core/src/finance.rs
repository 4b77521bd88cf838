//! Spending categories and the locale they are labelled in

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the statement export and of the labels written back out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(format!("unknown locale: {other} (expected pt-BR or en)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::PtBr => f.write_str("pt-BR"),
            Locale::En => f.write_str("en"),
        }
    }
}

/// Closed set of spending categories a transaction can be filed under
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Adjustment,
    Food,
    Hobby,
    Dog,
    Home,
    Construction,
    Education,
    Electronics,
    Daughter,
    Tax,
    Investment,
    Leisure,
    CreditCard,
    #[default]
    Other,
    Savings,
    FixedIncome,
    VariableIncome,
    SavingsWithdrawal,
    Remainder,
    Health,
    Services,
    Transport,
    Clothing,
}

impl Category {
    pub const ALL: [Category; 23] = [
        Category::Adjustment,
        Category::Food,
        Category::Hobby,
        Category::Dog,
        Category::Home,
        Category::Construction,
        Category::Education,
        Category::Electronics,
        Category::Daughter,
        Category::Tax,
        Category::Investment,
        Category::Leisure,
        Category::CreditCard,
        Category::Other,
        Category::Savings,
        Category::FixedIncome,
        Category::VariableIncome,
        Category::SavingsWithdrawal,
        Category::Remainder,
        Category::Health,
        Category::Services,
        Category::Transport,
        Category::Clothing,
    ];

    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::PtBr => self.label_pt(),
            Locale::En => self.label_en(),
        }
    }

    fn label_pt(&self) -> &'static str {
        match self {
            Category::Adjustment => "Ajuste",
            Category::Food => "Alimentação",
            Category::Hobby => "Hobby",
            Category::Dog => "Cachorro",
            Category::Home => "Casa",
            Category::Construction => "Construção",
            Category::Education => "Educação",
            Category::Electronics => "Eletrônicos",
            Category::Daughter => "Filha",
            Category::Tax => "Imposto",
            Category::Investment => "Investimento",
            Category::Leisure => "Lazer",
            Category::CreditCard => "Cartão de crédito",
            Category::Other => "Outros",
            Category::Savings => "Poupança",
            Category::FixedIncome => "Renda Fixa",
            Category::VariableIncome => "Renda Variável",
            Category::SavingsWithdrawal => "Resgate Poupança",
            Category::Remainder => "Restante",
            Category::Health => "Saúde",
            Category::Services => "Serviços",
            Category::Transport => "Transporte",
            Category::Clothing => "Vestuário",
        }
    }

    fn label_en(&self) -> &'static str {
        match self {
            Category::Adjustment => "Adjustment",
            Category::Food => "Food",
            Category::Hobby => "Hobby",
            Category::Dog => "Dog",
            Category::Home => "Home",
            Category::Construction => "Construction",
            Category::Education => "Education",
            Category::Electronics => "Electronics",
            Category::Daughter => "Daughter",
            Category::Tax => "Tax",
            Category::Investment => "Investment",
            Category::Leisure => "Leisure",
            Category::CreditCard => "Credit card",
            Category::Other => "Other",
            Category::Savings => "Savings",
            Category::FixedIncome => "Fixed Income",
            Category::VariableIncome => "Variable Income",
            Category::SavingsWithdrawal => "Savings Withdrawal",
            Category::Remainder => "Remainder",
            Category::Health => "Health",
            Category::Services => "Services",
            Category::Transport => "Transport",
            Category::Clothing => "Clothing",
        }
    }

    /// All labels for `locale`, in declaration order.
    pub fn labels(locale: Locale) -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label(locale)).collect()
    }

    /// Match a label coming back from a classifier.
    ///
    /// Surrounding whitespace, quotes and trailing punctuation are ignored and
    /// the comparison is case-insensitive. Anything else is rejected.
    pub fn from_label(text: &str, locale: Locale) -> Option<Category> {
        let cleaned = text
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .trim_end_matches(['.', '!', ';', ':'])
            .trim()
            .to_lowercase();
        if cleaned.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label(locale).to_lowercase() == cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_other() {
        assert_eq!(Category::default(), Category::Other);
        assert_eq!(Category::Other.label(Locale::PtBr), "Outros");
        assert_eq!(Category::Other.label(Locale::En), "Other");
    }

    #[test]
    fn test_from_label_tolerates_case_and_noise() {
        assert_eq!(Category::from_label("Saúde", Locale::PtBr), Some(Category::Health));
        assert_eq!(Category::from_label("  saúde. ", Locale::PtBr), Some(Category::Health));
        assert_eq!(
            Category::from_label("\"Cartão de Crédito\"", Locale::PtBr),
            Some(Category::CreditCard)
        );
        assert_eq!(Category::from_label("transport", Locale::En), Some(Category::Transport));
    }

    #[test]
    fn test_from_label_rejects_unknown() {
        assert_eq!(Category::from_label("Groceries", Locale::En), None);
        assert_eq!(Category::from_label("", Locale::PtBr), None);
        // English label is not accepted for a pt-BR run
        assert_eq!(Category::from_label("Health", Locale::PtBr), None);
    }

    #[test]
    fn test_labels_are_unique_per_locale() {
        for locale in [Locale::PtBr, Locale::En] {
            let labels = Category::labels(locale);
            let set: std::collections::HashSet<_> = labels.iter().collect();
            assert_eq!(set.len(), Category::ALL.len());
        }
    }

    #[test]
    fn test_locale_parse_and_serde() {
        assert_eq!("pt-BR".parse::<Locale>(), Ok(Locale::PtBr));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
        let json = serde_json::to_string(&Locale::PtBr).unwrap();
        assert_eq!(json, "\"pt-BR\"");
    }
}
