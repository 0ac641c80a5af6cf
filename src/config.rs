//! Runtime configuration and output file naming.
//!
//! The configuration is loaded once and passed by reference to whatever
//! needs it.

use crate::error::Result;
use crate::period::PeriodStrategy;
use chrono::NaiveDateTime;
use dialoguer::{theme::ColorfulTheme, Input};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file read when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Timestamp inserted into the output file name to avoid overwriting.
const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Settings for one run.
///
/// Keys are camelCase; PascalCase aliases are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Annual interest rate in percent, e.g. 5 for 5%
    #[serde(alias = "AnnualInterestRate")]
    pub annual_interest_rate: Decimal,

    #[serde(default, alias = "InputFile", deserialize_with = "non_empty_path")]
    pub input_file: Option<PathBuf>,

    #[serde(default, alias = "OutputFile", deserialize_with = "non_empty_path")]
    pub output_file: Option<PathBuf>,

    /// Replace an existing output file instead of writing a timestamped one
    #[serde(default, alias = "OverwriteExistingFile")]
    pub overwrite_existing_file: bool,

    #[serde(default, alias = "Period")]
    pub period: PeriodStrategy,
}

impl RuntimeConfig {
    /// Creates a config with the given rate in percent and no file paths.
    pub fn new(annual_interest_rate: Decimal) -> Self {
        RuntimeConfig {
            annual_interest_rate,
            input_file: None,
            output_file: None,
            overwrite_existing_file: false,
            period: PeriodStrategy::default(),
        }
    }

    /// Reads the config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// The annual rate as a fraction, e.g. 0.05 for 5%.
    pub fn annual_rate(&self) -> Decimal {
        self.annual_interest_rate / Decimal::ONE_HUNDRED
    }

    /// Asks on the terminal for any file path not set in the config.
    pub fn prompt_missing_paths(&mut self) -> Result<()> {
        let theme = ColorfulTheme::default();

        if self.input_file.is_none() {
            self.input_file = prompt_path(&theme, "Input file name")?;
        }
        if self.output_file.is_none() {
            self.output_file = prompt_path(&theme, "Output file name")?;
        }

        Ok(())
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(path: &Option<PathBuf>) -> String {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        }

        writeln!(f, "CONFIG:")?;
        writeln!(f, "- annualInterestRate: {}%", self.annual_interest_rate)?;
        writeln!(f, "- inputFile: {}", show(&self.input_file))?;
        writeln!(f, "- outputFile: {}", show(&self.output_file))?;
        writeln!(f, "- overwriteExistingFile: {}", self.overwrite_existing_file)?;
        write!(f, "- period: {:?}", self.period)
    }
}

fn prompt_path(theme: &ColorfulTheme, prompt: &str) -> Result<Option<PathBuf>> {
    let text = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| PathBuf::from(trimmed)))
}

fn non_empty_path<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

/// Picks the path the results are actually written to.
///
/// If `path` exists and overwriting is disabled, `now` is inserted before
/// the extension: `out.csv` becomes `out2024-05-01 10-20-30.csv`.
pub fn resolve_output_path(path: &Path, overwrite: bool, now: NaiveDateTime) -> PathBuf {
    if overwrite || !path.exists() {
        return path.to_path_buf();
    }

    let stamp = now.format(OUTPUT_TIMESTAMP_FORMAT);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}{}", stem, stamp),
    };

    path.with_file_name(file_name)
}
