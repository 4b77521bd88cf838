//! Deterministic keyword rules for Brazilian card-statement descriptions.
//!
//! Offline alternative to the LLM classifier. A description that matches no
//! rule is reported as an error so the caller falls back to the default.

use anyhow::{Result, bail};
use fatura_core::{Category, Locale};

use crate::classifier::Classifier;

/// Keyword groups, checked in order. Keywords are upper-case and accent-free;
/// surrounding spaces mark whole words.
const RULES: &[(Category, &[&str])] = &[
    (Category::CreditCard, &["ANUIDADE", "JUROS", "ENCARGOS", "TARIFA", "MULTA"]),
    (Category::Tax, &[" IOF ", "IPVA", "IPTU", "DARF", "RECEITA FEDERAL"]),
    (
        Category::Food,
        &[
            "IFOOD", "RAPPI", "SUPERMERCADO", "MERCADO", "PADARIA", "RESTAURANTE",
            "LANCHONETE", "ACOUGUE", "HORTIFRUTI", "PIZZARIA", "BURGER", "MCDONALDS",
            "CARREFOUR", "ASSAI", "ATACADAO", "PAO DE ACUCAR",
        ],
    ),
    (
        Category::Transport,
        &[
            "UBER", " 99 ", "99APP", "99POP", "POSTO", "IPIRANGA", "SHELL", "PETROBRAS",
            "ESTACIONAMENTO", "PEDAGIO", "SEM PARAR", "CONECTCAR", "METRO", "LATAM", "GOL LINHAS",
        ],
    ),
    (
        Category::Health,
        &[
            "DROGARIA", "FARMACIA", "DROGASIL", "RAIA", "PACHECO", "PAGUE MENOS", "CLINICA",
            "HOSPITAL", "LABORATORIO", "ODONTO", "UNIMED",
        ],
    ),
    (Category::Dog, &["PETZ", "COBASI", "PET SHOP", "PETSHOP", "VETERINAR"]),
    (
        Category::Services,
        &[
            "NETFLIX", "SPOTIFY", "AMAZON PRIME", "PRIMEVIDEO", "DISNEY", "HBO", "GLOBOPLAY",
            "YOUTUBE", "APPLE COM BILL", "GOOGLE", " VIVO ", " CLARO ", " TIM ", " OI ",
        ],
    ),
    (
        Category::Construction,
        &["LEROY MERLIN", "TELHANORTE", "CASA SHOW", "MATERIAIS DE CONSTRUCAO", "MADEIREIRA"],
    ),
    (Category::Home, &["TOK STOK", "TOKSTOK", "ETNA", "CAMICADO", "MOBLY", "CASAS BAHIA"]),
    (Category::Electronics, &["KABUM", "FAST SHOP", "PICHAU", "TERABYTE", "SAMSUNG"]),
    (
        Category::Clothing,
        &["RENNER", "RIACHUELO", " C A ", "ZARA", "HERING", "CENTAURO", "NETSHOES", "SHEIN"],
    ),
    (
        Category::Education,
        &["ESCOLA", "COLEGIO", "FACULDADE", "UNIVERSIDADE", "UDEMY", "ALURA", "LIVRARIA", "CURSO"],
    ),
    (Category::Hobby, &["STEAM", "PLAYSTATION", "NINTENDO", "XBOX"]),
    (Category::Leisure, &["CINEMA", "CINEMARK", "INGRESSO", "SYMPLA", "TEATRO"]),
];

/// Keyword classifier answering with labels in `locale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier {
    pub locale: Locale,
}

impl KeywordClassifier {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn categorize(&self, description: &str) -> Option<Category> {
        let text = normalize(description);
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(category, _)| *category)
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, description: &str, _categories: &[&str]) -> Result<String> {
        match self.categorize(description) {
            Some(category) => Ok(category.label(self.locale).to_string()),
            None => bail!("no keyword rule matches '{}'", description.trim()),
        }
    }
}

/// Upper-case, drop accents, turn punctuation into spaces and pad both ends.
fn normalize(description: &str) -> String {
    let mut out = String::with_capacity(description.len() + 2);
    out.push(' ');
    let mut last_space = true;
    for ch in description.chars().flat_map(char::to_uppercase) {
        let ch = fold_accent(ch);
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    if !last_space {
        out.push(' ');
    }
    out
}

fn fold_accent(ch: char) -> char {
    match ch {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        other => other,
    }
}
