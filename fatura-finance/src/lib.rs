//! fatura-finance: statement table normalization, classification and CSV export

pub mod amount;
pub mod category_rules;
pub mod classifier;
pub mod export;
pub mod pipeline;
pub mod table;
pub mod text;

pub use amount::{format_brl, parse_amount};
pub use category_rules::KeywordClassifier;
pub use classifier::{Classifier, classify_category};
pub use export::{output_path_for, write_csv};
pub use pipeline::{Normalizer, Stage, StageContext, first_of_month, normalize};
pub use table::{NormalizedRow, NormalizedTable};
