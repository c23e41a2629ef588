//! # restaurant-etl - Restaurant listing flattening and reporting
//!
//! Turns restaurant search results from a listing API into two reporting
//! tables: every restaurant (Q1) and every restaurant with an event in the
//! target month (Q2).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  JSON pages │────▶│  Validate   │────▶│   Flatten   │────▶│   Events    │
//! │ + countries │     │ (log only)  │     │ (one row/r.)│     │ (month win.)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                            ┌─────────────┐         │
//!                                            │ Q1 / Q2 CSV │◀────────┘
//!                                            └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restaurant_etl::{run_pipeline, EtlConfig};
//!
//! let config = EtlConfig::from_env()?;
//! let result = run_pipeline("restaurant_data.json".as_ref(), &config)?;
//! println!("{} events in {}", result.q2.len(), config.target_window);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`constants`] - Column names and sentinels
//! - [`config`] - Runtime configuration
//! - [`models`] - Raw API records
//! - [`source`] - Input loading with encoding detection
//! - [`transform`] - Lookup, flattening, event selection, views, pipeline
//! - [`validation`] - JSON schema checks
//! - [`export`] - CSV/JSON writers
//! - [`logs`] - Pipeline log sink

// Core modules
pub mod constants;
pub mod error;
pub mod models;

// Configuration
pub mod config;

// Logging
pub mod logs;

// Input
pub mod source;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod export;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    ExportError,
    PipelineError,
    SourceError,
    TransformError,
};

// =============================================================================
// Re-exports - Config & models
// =============================================================================

pub use config::{EtlConfig, OutputFormat, TargetWindow};

pub use models::{EventWrapper, RawEvent, RawRecord, RawRestaurant, Text};

// =============================================================================
// Re-exports - Source
// =============================================================================

pub use source::{
    event_wrappers,
    load_country_table,
    load_restaurant_pages,
    restaurant_records,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    extract_event,
    flatten_records,
    parse_restaurant_records,
    prepare_q1,
    prepare_q2,
    process_event_data,
    run_pipeline,
    transform_pages,
    Column,
    CountryTable,
    PipelineOutput,
    Q1Row,
    Q2Row,
    RestaurantTable,
    Row,
    RunSummary,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    validate,
    validate_events_schema,
    validate_results_schema,
    ValidationReport,
};
