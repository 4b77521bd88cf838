//! Column-level normalization of an extracted statement table.
//!
//! The normalizer is an ordered list of stages. Each stage names the columns
//! it needs and is skipped whole when one of them is missing, so partial
//! exports still come out with whatever steps apply to them.

use chrono::{Datelike, NaiveDate};
use fatura_core::{Cell, DataBlock, FaturaError, Labels, Result};
use tracing::{debug, warn};

use crate::amount::parse_amount_cell;
use crate::classifier::{Classifier, classify_category};
use crate::table::NormalizedTable;
use crate::text::title_case;

/// Everything a stage may read besides the table itself.
pub struct StageContext<'a> {
    pub labels: &'a Labels,
    /// `None` when classification is disabled.
    pub classifier: Option<&'a dyn Classifier>,
    /// Value written over every date (first day of the processing month).
    pub reference_date: NaiveDate,
}

pub trait Stage {
    fn name(&self) -> &'static str;

    /// Columns that must exist for the stage to run.
    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str>;

    /// Name of an earlier stage that must have run first.
    fn after(&self) -> Option<&'static str> {
        None
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()>;
}

/// Insert an empty category column right before the description.
pub struct CategoryColumn;

impl Stage for CategoryColumn {
    fn name(&self) -> &'static str {
        "category-column"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.date.as_str(), labels.description.as_str()]
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        if let Some(at) = block.position(&ctx.labels.description) {
            block.insert_column(at, &ctx.labels.category, Cell::Empty);
        }
        Ok(())
    }
}

/// Fill the category column, one classifier call per row.
///
/// Without a classifier every row gets the default category. A failed or
/// unrecognized answer only affects its own row.
pub struct Classify;

impl Stage for Classify {
    fn name(&self) -> &'static str {
        "classify"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.category.as_str(), labels.description.as_str()]
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        let labels = ctx.labels;
        let (Some(cat_col), Some(desc_col)) = (
            block.position(&labels.category),
            block.position(&labels.description),
        ) else {
            return Ok(());
        };

        for (i, row) in block.rows_mut().iter_mut().enumerate() {
            let description = row[desc_col].label();
            let category = match ctx.classifier {
                Some(classifier) if !description.trim().is_empty() => {
                    match classify_category(classifier, &description, labels.locale) {
                        Ok(category) => category,
                        Err(e) => {
                            warn!(row = i + 1, error = %e, "classification failed; using default category");
                            Default::default()
                        }
                    }
                }
                _ => Default::default(),
            };
            row[cat_col] = Cell::text(category.label(labels.locale));
        }
        Ok(())
    }
}

/// Append the paid column with the paid marker on every row.
pub struct PaidColumn;

impl Stage for PaidColumn {
    fn name(&self) -> &'static str {
        "paid-column"
    }

    fn required_columns<'l>(&self, _labels: &'l Labels) -> Vec<&'l str> {
        Vec::new()
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        block.set_column(&ctx.labels.paid, Cell::text(ctx.labels.paid_marker.as_str()));
        Ok(())
    }
}

/// `"LOJA "` + installment `2` -> `"[Cartão] LOJA (Parcela 2)"`, then drop the installment column.
pub struct InstallmentDescription;

impl Stage for InstallmentDescription {
    fn name(&self) -> &'static str {
        "installment-description"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.installment.as_str(), labels.description.as_str()]
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        let labels = ctx.labels;
        let (Some(inst_col), Some(desc_col)) = (
            block.position(&labels.installment),
            block.position(&labels.description),
        ) else {
            return Ok(());
        };

        for row in block.rows_mut() {
            let mut description = format!("{} {}", labels.card_tag, row[desc_col].label().trim());
            let installment = &row[inst_col];
            if !installment.is_missing() {
                description.push_str(&format!(
                    " ({} {})",
                    labels.installment_word,
                    installment.label().trim()
                ));
            }
            row[desc_col] = Cell::Text(description);
        }

        block.drop_column(&labels.installment);
        Ok(())
    }
}

/// Append the original purchase date as `{em 11/Mar}` to rewritten descriptions.
///
/// Rows whose date does not parse as day/month/year keep their description.
pub struct PurchaseDateSuffix;

impl Stage for PurchaseDateSuffix {
    fn name(&self) -> &'static str {
        "purchase-date-suffix"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.date.as_str(), labels.description.as_str()]
    }

    fn after(&self) -> Option<&'static str> {
        Some("installment-description")
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        let labels = ctx.labels;
        let (Some(date_col), Some(desc_col)) = (
            block.position(&labels.date),
            block.position(&labels.description),
        ) else {
            return Ok(());
        };

        for (i, row) in block.rows_mut().iter_mut().enumerate() {
            let Some(date) = row[date_col].as_text().and_then(parse_statement_date) else {
                debug!(row = i + 1, date = %row[date_col].label(), "unparsable purchase date; description left as is");
                continue;
            };
            let suffix = format!(
                "{{{}{}/{}}}",
                labels.date_lead,
                date.day(),
                date.format("%b")
            );
            let description = format!("{} {}", row[desc_col].label(), suffix);
            row[desc_col] = Cell::Text(description);
        }
        Ok(())
    }
}

fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

/// Title-case every text description.
pub struct TitleCase;

impl Stage for TitleCase {
    fn name(&self) -> &'static str {
        "title-case"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.description.as_str()]
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        if let Some(cells) = block.column_mut(&ctx.labels.description) {
            for cell in cells {
                if let Cell::Text(s) = cell {
                    *s = title_case(s);
                }
            }
        }
        Ok(())
    }
}

/// Stamp every row with the reference date, month/day/year.
pub struct ReferenceDate;

impl Stage for ReferenceDate {
    fn name(&self) -> &'static str {
        "reference-date"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.date.as_str()]
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        let stamp = ctx.reference_date.format("%m/%d/%Y").to_string();
        block.set_column(&ctx.labels.date, Cell::Text(stamp));
        Ok(())
    }
}

/// Parse every amount to a number. One bad cell fails the whole table.
pub struct Amount;

impl Stage for Amount {
    fn name(&self) -> &'static str {
        "amount"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.amount.as_str()]
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        let Some(cells) = block.column_mut(&ctx.labels.amount) else {
            return Ok(());
        };
        for (i, cell) in cells.enumerate() {
            let value = parse_amount_cell(cell).ok_or_else(|| FaturaError::AmountParse {
                row: i + 1,
                value: cell.label(),
            })?;
            *cell = Cell::Number(value);
        }
        Ok(())
    }
}

/// Largest amount first; ties keep their order.
pub struct OrderByAmount;

impl Stage for OrderByAmount {
    fn name(&self) -> &'static str {
        "order-by-amount"
    }

    fn required_columns<'l>(&self, labels: &'l Labels) -> Vec<&'l str> {
        vec![labels.amount.as_str()]
    }

    fn after(&self) -> Option<&'static str> {
        Some("amount")
    }

    fn apply(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<()> {
        let Some(col) = block.position(&ctx.labels.amount) else {
            return Ok(());
        };
        let key = |row: &Vec<Cell>| row[col].as_number().unwrap_or(f64::NEG_INFINITY);
        block.sort_rows_by(|a, b| key(b).total_cmp(&key(a)));
        Ok(())
    }
}

/// Ordered stage list applied to every extracted table.
pub struct Normalizer {
    stages: Vec<Box<dyn Stage>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(vec![
            Box::new(CategoryColumn),
            Box::new(Classify),
            Box::new(PaidColumn),
            Box::new(InstallmentDescription),
            Box::new(PurchaseDateSuffix),
            Box::new(TitleCase),
            Box::new(ReferenceDate),
            Box::new(Amount),
            Box::new(OrderByAmount),
        ])
    }
}

impl Normalizer {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the stages in order and return the names of those that ran.
    pub fn run(&self, block: &mut DataBlock, ctx: &StageContext<'_>) -> Result<Vec<&'static str>> {
        let mut ran: Vec<&'static str> = Vec::new();

        for stage in &self.stages {
            let missing: Vec<&str> = stage
                .required_columns(ctx.labels)
                .into_iter()
                .filter(|c| !block.has_column(c))
                .collect();
            if !missing.is_empty() {
                debug!(stage = stage.name(), ?missing, "skipping stage: missing columns");
                continue;
            }
            if let Some(dep) = stage.after() {
                if !ran.contains(&dep) {
                    debug!(stage = stage.name(), after = dep, "skipping stage: prerequisite did not run");
                    continue;
                }
            }

            stage.apply(block, ctx)?;
            ran.push(stage.name());
        }

        Ok(ran)
    }
}

/// First day of the month `date` falls in.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Normalize an extracted table with the default stage list.
pub fn normalize(
    mut block: DataBlock,
    classifier: Option<&dyn Classifier>,
    reference_date: NaiveDate,
    labels: &Labels,
) -> Result<NormalizedTable> {
    let ctx = StageContext {
        labels,
        classifier,
        reference_date,
    };
    Normalizer::default().run(&mut block, &ctx)?;
    Ok(NormalizedTable::new(block, labels.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatura_core::{Category, Locale};

    fn labels() -> Labels {
        Labels::for_locale(Locale::En)
    }

    fn block(header: &[&str], rows: &[&[&str]]) -> DataBlock {
        let header: Vec<Cell> = header.iter().map(|h| Cell::from(*h)).collect();
        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
            .collect();
        DataBlock::from_header(&header, &rows)
    }

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_default_stage_order() {
        assert_eq!(
            Normalizer::default().stage_names(),
            [
                "category-column",
                "classify",
                "paid-column",
                "installment-description",
                "purchase-date-suffix",
                "title-case",
                "reference-date",
                "amount",
                "order-by-amount",
            ]
        );
    }

    #[test]
    fn test_category_column_sits_before_description() {
        let mut b = block(&["Date", "Description", "Amount"], &[&["01/03/2024", "a", "1,00"]]);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        let ran = Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(b.columns(), ["Date", "Category", "Description", "Amount", "Paid"]);
        assert!(!ran.contains(&"installment-description"));
        assert!(!ran.contains(&"purchase-date-suffix"));
        assert_eq!(b.get(0, "Category"), Some(&Cell::text("Other")));
    }

    #[test]
    fn test_category_needs_date_column() {
        let mut b = block(&["Description", "Amount"], &[&["a", "1,00"]]);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        let ran = Normalizer::default().run(&mut b, &ctx).unwrap();
        assert!(!b.has_column("Category"));
        assert!(!ran.contains(&"classify"));
        assert!(ran.contains(&"title-case"));
    }

    #[test]
    fn test_installment_without_value() {
        let mut b = block(
            &["Date", "Description", "Installment", "Amount"],
            &[&["10/03/2024", "  MARKET  ", "", "150,00"]],
        );
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(b.get(0, "Description"), Some(&Cell::text("[Card] Market {10/Mar}")));
        assert!(!b.has_column("Installment"));
    }

    #[test]
    fn test_numeric_installment_prints_compact() {
        let header = [Cell::text("Date"), Cell::text("Description"), Cell::text("Installment"), Cell::text("Amount")];
        let rows = vec![vec![Cell::text("05/01/2024"), Cell::text("tv"), Cell::Number(3.0), Cell::Number(99.9)]];
        let mut b = DataBlock::from_header(&header, &rows);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(b.get(0, "Description"), Some(&Cell::text("[Card] Tv (Installment 3) {5/Jan}")));
    }

    #[test]
    fn test_bad_purchase_date_keeps_description() {
        let mut b = block(
            &["Date", "Description", "Installment", "Amount"],
            &[&["2024-03-10", "shop", "1", "1,00"], &["31/02/2024", "shop", "", "1,00"]],
        );
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(b.get(0, "Description"), Some(&Cell::text("[Card] Shop (Installment 1)")));
        assert_eq!(b.get(1, "Description"), Some(&Cell::text("[Card] Shop")));
    }

    #[test]
    fn test_suffix_requires_installment_rewrite() {
        let mut b = block(&["Date", "Description"], &[&["10/03/2024", "shop"]]);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        let ran = Normalizer::default().run(&mut b, &ctx).unwrap();
        assert!(!ran.contains(&"purchase-date-suffix"));
        assert_eq!(b.get(0, "Description"), Some(&Cell::text("Shop")));
    }

    #[test]
    fn test_title_case_passes_numbers_through() {
        let header = [Cell::text("Description")];
        let rows = vec![vec![Cell::Number(7.0)], vec![Cell::Empty], vec![Cell::text("PADARIA")]];
        let mut b = DataBlock::from_header(&header, &rows);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(b.rows()[0][0], Cell::Number(7.0));
        assert_eq!(b.rows()[1][0], Cell::Empty);
        assert_eq!(b.rows()[2][0], Cell::text("Padaria"));
    }

    #[test]
    fn test_dates_are_overwritten_with_reference() {
        let mut b = block(&["Date", "Amount"], &[&["10/03/2024", "1,00"], &["", "2,00"]]);
        let labels = labels();
        let reference = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: reference };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        for row in 0..2 {
            assert_eq!(b.get(row, "Date"), Some(&Cell::text("10/01/2026")));
        }
    }

    #[test]
    fn test_amount_failure_is_fatal() {
        let mut b = block(&["Amount"], &[&["1,00"], &["n/a"]]);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        let err = Normalizer::default().run(&mut b, &ctx).unwrap_err();
        match err {
            FaturaError::AmountParse { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_amount_is_fatal() {
        let mut b = block(&["Description", "Amount"], &[&["a", "1,00"], &["b", ""]]);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        assert!(matches!(
            Normalizer::default().run(&mut b, &ctx),
            Err(FaturaError::AmountParse { row: 2, .. })
        ));
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut b = block(
            &["Description", "Amount"],
            &[
                &["first", "10,00"],
                &["refund", "-5,00"],
                &["second", "10,00"],
                &["big", "1.000,00"],
                &["third", "10,00"],
            ],
        );
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        let order: Vec<String> = b.rows().iter().map(|r| r[0].label()).collect();
        assert_eq!(order, ["Big", "First", "Second", "Third", "Refund"]);
    }

    #[test]
    fn test_classifier_failure_is_isolated_per_row() {
        let classifier = |desc: &str, _: &[&str]| -> anyhow::Result<String> {
            match desc {
                "Uber" => Ok("Transport".to_string()),
                "Broken" => anyhow::bail!("timeout"),
                _ => Ok("Made Up".to_string()),
            }
        };
        let mut b = block(
            &["Date", "Description", "Amount"],
            &[&["01/03/2024", "Uber", "3,00"], &["01/03/2024", "Broken", "2,00"], &["01/03/2024", "Other thing", "1,00"]],
        );
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: Some(&classifier), reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(b.get(0, "Category"), Some(&Cell::text("Transport")));
        assert_eq!(b.get(1, "Category"), Some(&Cell::text("Other")));
        assert_eq!(b.get(2, "Category"), Some(&Cell::text("Other")));
    }

    #[test]
    fn test_classifier_sees_original_description() {
        let seen = std::cell::RefCell::new(Vec::new());
        let classifier = |desc: &str, _: &[&str]| -> anyhow::Result<String> {
            seen.borrow_mut().push(desc.to_string());
            Ok(Category::Food.label(Locale::En).to_string())
        };
        let mut b = block(
            &["Date", "Description", "Installment", "Amount"],
            &[&["01/03/2024", "PADARIA", "", "3,00"]],
        );
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: Some(&classifier), reference_date: march() };
        Normalizer::default().run(&mut b, &ctx).unwrap();
        assert_eq!(seen.borrow().as_slice(), ["PADARIA"]);
        assert_eq!(b.get(0, "Category"), Some(&Cell::text("Food")));
    }

    #[test]
    fn test_custom_stage_list() {
        let normalizer = Normalizer::new(vec![Box::new(PaidColumn), Box::new(OrderByAmount)]);
        let mut b = block(&["Amount"], &[&["1,00"]]);
        let labels = labels();
        let ctx = StageContext { labels: &labels, classifier: None, reference_date: march() };
        let ran = normalizer.run(&mut b, &ctx).unwrap();
        // ordering needs parsed amounts
        assert_eq!(ran, ["paid-column"]);
    }

    #[test]
    fn test_first_of_month() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(first_of_month(d), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    }
}
