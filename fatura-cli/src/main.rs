use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fatura_core::Locale;
use fatura_finance::amount::parse_amount_cell;
use fatura_finance::{Classifier, KeywordClassifier, first_of_month, format_brl};
use fatura_ingest::{extract_with, read_first_sheet};
use std::path::PathBuf;
use tracing::warn;

mod auth;
mod batch;
mod config;
mod llm;
mod logging;
mod state;

use batch::{BatchOptions, run_batch};
use config::{Config, Provider, load_config};
use llm::OpenAiClassifier;

#[derive(Parser, Debug)]
#[command(name = "fatura", version, about = "Clean up credit-card statement spreadsheets into CSV")]
struct Cli {
    /// Config file (default: ~/.fatura/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every .xls/.xlsx statement in the input folder to CSV
    Convert {
        /// Folder with statement workbooks
        #[arg(long)]
        input: Option<PathBuf>,

        /// Folder for the CSV files (created if missing)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Reconciliation month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Column names and labels of the export
        #[arg(long)]
        locale: Option<Locale>,

        /// Classify descriptions into spending categories
        #[arg(long, overrides_with = "no_classify")]
        classify: bool,

        /// Leave every category at the default
        #[arg(long, overrides_with = "classify")]
        no_classify: bool,

        /// Classifier to use when classification is on
        #[arg(long, value_enum)]
        provider: Option<Provider>,
    },

    /// Show where the transaction table sits in one statement
    Inspect {
        file: PathBuf,
    },

    /// Manage ~/.fatura/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store credentials for the LLM classifier
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Save an OpenAI API key to ~/.fatura/auth.json
    PasteOpenaiApiKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Convert {
            input,
            output,
            month,
            locale,
            classify,
            no_classify,
            provider,
        } => {
            let mut cfg = load_config(cli.config.as_deref())?;
            if let Some(dir) = input {
                cfg.input.dir = dir;
            }
            if let Some(dir) = output {
                cfg.output.dir = dir;
            }
            if let Some(locale) = locale {
                cfg.layout.locale = locale;
            }
            if let Some(provider) = provider {
                cfg.classifier.provider = provider;
            }
            if classify {
                cfg.classifier.enabled = true;
            }
            if no_classify {
                cfg.classifier.enabled = false;
            }
            convert(&cfg, month.as_deref())?;
        }

        Command::Inspect { file } => {
            let cfg = load_config(cli.config.as_deref())?;
            inspect(&cfg, &file)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
            ConfigCommand::Show => {
                let cfg = load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
        },
    }

    Ok(())
}

fn convert(cfg: &Config, month: Option<&str>) -> Result<()> {
    let reference_date = match month {
        Some(m) => parse_month(m)?,
        None => first_of_month(Local::now().date_naive()),
    };

    let classifier = build_classifier(cfg)?;

    let opts = BatchOptions {
        input_dir: cfg.input.dir.clone(),
        output_dir: cfg.output.dir.clone(),
        layout: cfg.layout.layout(),
        labels: cfg.layout.labels(),
        reference_date,
    };

    let report = run_batch(&opts, classifier.as_deref())?;

    let rows: usize = report.processed.iter().map(|(_, _, n)| n).sum();
    println!(
        "\n{} of {} files converted ({} rows, dated {})",
        report.processed.len(),
        report.total(),
        rows,
        reference_date.format("%m/%d/%Y")
    );
    for (path, err) in &report.failed {
        println!("  failed: {}: {}", path.display(), err);
    }

    if !report.failed.is_empty() {
        bail!("{} file(s) failed", report.failed.len());
    }
    Ok(())
}

fn build_classifier(cfg: &Config) -> Result<Option<Box<dyn Classifier>>> {
    if !cfg.classifier.enabled {
        return Ok(None);
    }
    match cfg.classifier.provider {
        Provider::Rules => Ok(Some(Box::new(KeywordClassifier::new(cfg.layout.locale)))),
        Provider::Openai => match auth::openai_api_key()? {
            Some(key) => Ok(Some(Box::new(OpenAiClassifier::new(&cfg.classifier, key)?))),
            None => {
                warn!("no OpenAI API key (set OPENAI_API_KEY or run: fatura auth paste-openai-api-key); categories stay at the default");
                Ok(None)
            }
        },
    }
}

/// `2024-03` -> 2024-03-01
fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{s}' (expected YYYY-MM)"))
}

fn inspect(cfg: &Config, file: &std::path::Path) -> Result<()> {
    let grid = read_first_sheet(file).with_context(|| format!("reading {}", file.display()))?;
    let ex = extract_with(&grid, &cfg.layout.layout())
        .with_context(|| format!("locating table in {}", file.display()))?;

    println!("File:           {}", file.display());
    println!("Sheet rows:     {}", grid.len());
    println!("Header marker:  row {}", ex.marker_row + 1);
    println!("Column headers: row {}", ex.header_row + 1);
    match ex.summary_row {
        Some(r) => println!("Summary marker: row {}", r + 1),
        None => println!("Summary marker: not found (table runs to the end of the sheet)"),
    }
    println!("Columns:        {}", ex.block.columns().join(" | "));
    println!("Data rows:      {}", ex.block.row_count());

    let labels = cfg.layout.labels();
    if let Some(col) = ex.block.position(&labels.amount) {
        let total: f64 = ex
            .block
            .rows()
            .iter()
            .filter_map(|r| parse_amount_cell(&r[col]))
            .sum();
        println!("Amount total:   {}", format_brl(total));
    }

    Ok(())
}
