//! Run configuration
//!
//! Every field has a default matching the exports this tool was built for
//! (UAH amounts, EUR column, exchangeratesapi.io). A TOML file can override
//! any subset of them.

use crate::enrich::ColumnLayout;
use crate::error::{FxEnrichError, Result};
use crate::rates::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FX_ENRICH_CONFIG";

/// Settings for one run, deserialized from TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichConfig {
    /// File holding the provider access key
    pub credential_path: PathBuf,
    /// Provider endpoint; the day is appended as `/{YYYY-MM-DD}`
    pub base_url: String,
    /// Symbol requested from the provider (the table's native currency)
    pub symbol: String,
    /// Header label of the inserted column
    pub column_label: String,
    /// Prepended to the input file name to form the output file name
    pub output_prefix: String,
    /// Field separator for both input and output
    pub delimiter: char,
    pub timestamp_column: usize,
    pub amount_column: usize,
    /// Index the new column is inserted at
    pub insert_column: usize,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            credential_path: PathBuf::from("api_key.txt"),
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: "UAH".to_string(),
            column_label: "EUR".to_string(),
            output_prefix: "modified_".to_string(),
            delimiter: ',',
            timestamp_column: 0,
            amount_column: 3,
            insert_column: 5,
            timeout_secs: 30,
        }
    }
}

impl EnrichConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EnrichConfig = toml::from_str(contents)
            .map_err(|e| FxEnrichError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FxEnrichError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Default per-user location: `~/.fx-enrich/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".fx-enrich").join("config.toml"))
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit file (from `FX_ENRICH_CONFIG`) must load cleanly. A broken
    /// file at the default location only produces a warning.
    pub fn load() -> Result<Self> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
                }
            }
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.len() != 3 || !self.symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxEnrichError::Config(format!(
                "symbol must be a 3-letter currency code, got {:?}",
                self.symbol
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(FxEnrichError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.output_prefix.is_empty() {
            return Err(FxEnrichError::Config(
                "output_prefix must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(FxEnrichError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.layout().validate()
    }

    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout {
            timestamp: self.timestamp_column,
            amount: self.amount_column,
            insert_at: self.insert_column,
            label: self.column_label.clone(),
        }
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
