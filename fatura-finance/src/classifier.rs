//! Pluggable description -> category classification.

use anyhow::{Result, bail};
use fatura_core::{Category, Locale};

/// Maps a free-text description to one of `categories`.
///
/// Implementations are untrusted: whatever they return is checked against
/// the known category set before it is used.
pub trait Classifier {
    fn classify(&self, description: &str, categories: &[&str]) -> Result<String>;
}

impl<F> Classifier for F
where
    F: Fn(&str, &[&str]) -> Result<String>,
{
    fn classify(&self, description: &str, categories: &[&str]) -> Result<String> {
        self(description, categories)
    }
}

/// Ask `classifier` for a label and validate it against the category set.
pub fn classify_category(
    classifier: &dyn Classifier,
    description: &str,
    locale: Locale,
) -> Result<Category> {
    let labels = Category::labels(locale);
    let answer = classifier.classify(description, &labels)?;
    match Category::from_label(&answer, locale) {
        Some(category) => Ok(category),
        None => bail!("unrecognized category label '{}'", answer.trim()),
    }
}
