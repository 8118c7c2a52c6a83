use crate::core::processor::SUPPORTED_EXTENSIONS;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_non_empty_string, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_phone_region() -> String {
    "US".to_string()
}

/// Options passed through to the parsers and the cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserOptions {
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
    pub sheet_name: Option<String>,
    #[serde(default = "default_phone_region")]
    pub phone_region: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            encoding: None,
            delimiter: None,
            sheet_name: None,
            phone_region: default_phone_region(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "lead-ingest")]
#[command(about = "Parse, clean and deduplicate lead files (CSV, JSON, XLSX)")]
pub struct CliConfig {
    /// Lead file to ingest
    pub input: String,

    /// TOML file with ingestion options; CLI flags take precedence
    #[arg(long)]
    pub config: Option<String>,

    /// Character encoding to try first for CSV files
    #[arg(long)]
    pub encoding: Option<String>,

    /// CSV delimiter; sniffed from the first line when omitted
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Worksheet to read; defaults to the first sheet
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Default region for phone numbers without a country code [default: US]
    #[arg(long)]
    pub phone_region: Option<String>,

    /// Write the full JSON report to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Attach heuristic lead scores to the summary
    #[arg(long)]
    pub score: bool,

    /// Emit logs as JSON instead of the compact console format
    #[arg(long)]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// The subset of options that may come from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
    pub sheet_name: Option<String>,
    pub phone_region: Option<String>,
    pub report: Option<String>,
}

impl CliConfig {
    /// Folds a TOML config file into the CLI arguments. Flags given on the
    /// command line win over file values.
    pub fn merge_config_file(&mut self) -> Result<()> {
        let Some(config_path) = &self.config else {
            return Ok(());
        };
        let content = std::fs::read_to_string(config_path)?;
        let file_config: FileConfig = toml::from_str(&content)?;

        if self.encoding.is_none() {
            self.encoding = file_config.encoding;
        }
        if self.delimiter.is_none() {
            self.delimiter = file_config.delimiter;
        }
        if self.sheet_name.is_none() {
            self.sheet_name = file_config.sheet_name;
        }
        // The CLI flag stays None unless given explicitly, so an explicit
        // `--phone-region US` is never mistaken for the default.
        if self.phone_region.is_none() {
            self.phone_region = file_config.phone_region;
        }
        if self.report.is_none() {
            self.report = file_config.report;
        }
        Ok(())
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            encoding: self.encoding.clone(),
            delimiter: self.delimiter,
            sheet_name: self.sheet_name.clone(),
            phone_region: self
                .phone_region
                .clone()
                .unwrap_or_else(default_phone_region),
        }
    }

    pub fn input_path(&self) -> &Path {
        Path::new(&self.input)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("input", &self.input)?;
        validate_file_extension("input", &self.input, SUPPORTED_EXTENSIONS)?;
        if let Some(region) = &self.phone_region {
            validate_non_empty_string("phone_region", region)?;
        }
        Ok(())
    }
}
