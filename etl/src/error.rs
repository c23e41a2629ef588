//! Error types for the restaurant ETL pipeline.
//!
//! - [`SourceError`] - reading and decoding input files
//! - [`TransformError`] - fatal record and date failures during the transform
//! - [`ExportError`] - writing the Q1/Q2 views and the run summary
//! - [`ConfigError`] - invalid configuration values
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Lower-level errors convert into [`PipelineError`] through `From`,
//! so `?` works across stage boundaries.
//!
//! Validation failures are not errors here: the validators log them and
//! return a report instead.

use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while loading raw input files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Bytes could not be decoded with the detected encoding.
    #[error("Failed to decode input as {encoding}")]
    EncodingError { encoding: String },

    /// Input is not valid JSON.
    #[error("Invalid JSON input: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Country reference table could not be parsed.
    #[error("Invalid country reference table: {0}")]
    CsvError(#[from] csv::Error),

    /// Country reference file has an unsupported shape or extension.
    #[error("Unsupported country reference file: {0}")]
    UnsupportedCountryFile(String),

    /// Input JSON has an unexpected top-level shape.
    #[error("Unexpected input shape: {0}")]
    UnexpectedShape(String),
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Structural and parse failures. Each one aborts the whole batch.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A raw record is missing an expected key or has the wrong type.
    #[error("Malformed restaurant record at index {index}: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An event reached during the scan is missing a key or has the wrong type.
    #[error("Malformed event {index} in row {row}: {source}")]
    MalformedEvent {
        row: usize,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An event date is not in `YYYY-MM-DD` form.
    #[error("Invalid {field} '{value}' in row {row}: {source}")]
    InvalidDate {
        row: usize,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing output files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error.
    #[error("Export IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writer error.
    #[error("Export CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error.
    #[error("Export JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Target month is not `YYYY-MM` or names a non-existent month.
    #[error("Invalid target month '{0}', expected YYYY-MM")]
    InvalidTargetMonth(String),

    /// Unknown output format.
    #[error("Invalid output format '{0}', expected csv or json")]
    InvalidFormat(String),

    /// Boolean environment flag with an unexpected value.
    #[error("Invalid value '{value}' for {key}")]
    InvalidFlag { key: String, value: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input loading error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Fatal transform error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Output error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
