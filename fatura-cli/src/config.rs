use anyhow::{Context, Result};
use fatura_core::{HEADER_MARKER, Labels, Locale, SUMMARY_MARKER};
use fatura_ingest::Layout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_fatura_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputSection,
    pub output: OutputSection,
    pub layout: LayoutSection,
    pub classifier: ClassifierSection,
}

/// Folder scanned for `.xls`/`.xlsx` statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    pub dir: PathBuf,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("input"),
        }
    }
}

/// Folder the cleaned CSV files are written to (created when missing).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    pub locale: Locale,
    pub header_marker: String,
    pub summary_marker: String,
    /// Rows between the header marker and the column names.
    pub header_skip: usize,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            locale: Locale::PtBr,
            header_marker: HEADER_MARKER.to_string(),
            summary_marker: SUMMARY_MARKER.to_string(),
            header_skip: 2,
        }
    }
}

impl LayoutSection {
    pub fn layout(&self) -> Layout {
        Layout {
            header_marker: self.header_marker.clone(),
            summary_marker: self.summary_marker.clone(),
            header_skip: self.header_skip,
        }
    }

    pub fn labels(&self) -> Labels {
        Labels::for_locale(self.locale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Offline keyword rules
    Rules,
    /// OpenAI-compatible chat completions API
    Openai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    pub enabled: bool,
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Per-request timeout; an expired request counts as a failed classification.
    pub timeout_secs: u64,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: Provider::Openai,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.3,
            timeout_secs: 15,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_fatura_home()?.join("config.toml"))
}

/// Load `path` (or `~/.fatura/config.toml`); a missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
