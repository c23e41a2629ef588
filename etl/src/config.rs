//! Runtime configuration.
//!
//! Defaults reproduce the reporting run the pipeline was written for:
//! April 2019 events, CSV output into the current directory. Values can be
//! overridden from the environment (a `.env` file is honoured) and then by
//! command line flags.
//!
//! | Variable              | Example          |
//! |-----------------------|------------------|
//! | `ETL_TARGET_MONTH`    | `2019-04`        |
//! | `ETL_OUTPUT_DIR`      | `out/`           |
//! | `ETL_OUTPUT_FORMAT`   | `csv` / `json`   |
//! | `ETL_COUNTRY_CODES`   | `Country-Code.csv` |
//! | `ETL_SKIP_VALIDATION` | `true`           |

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_TARGET_MONTH, DEFAULT_TARGET_YEAR};
use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Target window
// =============================================================================

/// Calendar month an event must fall in to be reported.
///
/// Both bounds are inclusive: an event qualifies when it starts on or after
/// `first_day` and ends on or before `last_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl TargetWindow {
    /// Window covering a whole calendar month.
    pub fn month(year: i32, month: u32) -> ConfigResult<Self> {
        let invalid = || ConfigError::InvalidTargetMonth(format!("{:04}-{:02}", year, month));

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_month.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;

        Ok(Self { first_day, last_day })
    }

    /// Check whether an event's dates put it inside the window.
    pub fn contains(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start >= self.first_day && end <= self.last_day
    }
}

impl Default for TargetWindow {
    fn default() -> Self {
        Self::month(DEFAULT_TARGET_YEAR, DEFAULT_TARGET_MONTH)
            .expect("Invalid default target month")
    }
}

impl FromStr for TargetWindow {
    type Err = ConfigError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidTargetMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::month(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.first_day.year(), self.first_day.month())
    }
}

// =============================================================================
// Output format
// =============================================================================

/// File format of the exported views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

// =============================================================================
// Pipeline configuration
// =============================================================================

/// Options for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Month events must fall in
    pub target_window: TargetWindow,

    /// Directory receiving the exported views
    pub output_dir: PathBuf,

    /// Format of the exported views
    pub output_format: OutputFormat,

    /// Country code reference file
    pub country_codes: Option<PathBuf>,

    /// Skip the schema validators
    pub skip_validation: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            target_window: TargetWindow::default(),
            output_dir: PathBuf::from("."),
            output_format: OutputFormat::Csv,
            country_codes: None,
            skip_validation: false,
        }
    }
}

impl EtlConfig {
    /// Build the configuration from `ETL_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(month) = lookup("ETL_TARGET_MONTH") {
            config.target_window = month.parse()?;
        }
        if let Some(dir) = lookup("ETL_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup("ETL_OUTPUT_FORMAT") {
            config.output_format = format.parse()?;
        }
        if let Some(path) = lookup("ETL_COUNTRY_CODES") {
            config.country_codes = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup("ETL_SKIP_VALIDATION") {
            config.skip_validation = parse_flag("ETL_SKIP_VALIDATION", &flag)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key: key.to_string(), value: value.to_string() }),
    }
}
