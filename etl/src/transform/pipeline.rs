//! High-level pipeline API.
//!
//! Combines every step of a run:
//! loading, validation, flattening, event selection, projection and export.
//!
//! # Example
//!
//! ```rust,ignore
//! use restaurant_etl::{run_pipeline, EtlConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EtlConfig::from_env()?;
//!     let result = run_pipeline(Path::new("restaurant_data.json"), &config)?;
//!
//!     println!("{} restaurants, {} April events", result.q1.len(), result.q2.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::country::CountryTable;
use super::events::process_event_data;
use super::flatten::{flatten_records, parse_restaurant_records};
use super::template::RestaurantTable;
use super::views::{prepare_q1, prepare_q2, Q1Row, Q2Row};
use crate::config::EtlConfig;
use crate::constants::{Q1_FILE_STEM, Q2_FILE_STEM, RUN_SUMMARY_FILE};
use crate::error::PipelineResult;
use crate::export::{export_view, write_json};
use crate::logs::{log_info, log_success, log_warning};
use crate::source::{event_wrappers, load_country_table, load_restaurant_pages, restaurant_records};
use crate::validation::{validate_events_schema, validate_results_schema, ValidationReport};

/// What happened during one run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Target month as `YYYY-MM`
    pub target_month: String,
    pub result_pages: usize,
    pub restaurant_records: usize,
    pub q1_rows: usize,
    pub q2_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_validation: Option<ValidationReport>,
    /// Files written by the run
    pub outputs: Vec<PathBuf>,
}

/// Result of a transform
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The finished intermediate table
    pub table: RestaurantTable,
    /// Restaurants view
    pub q1: Vec<Q1Row>,
    /// Restaurant events view
    pub q2: Vec<Q2Row>,
    pub summary: RunSummary,
}

/// Transform already-loaded result pages. Nothing is written to disk.
pub fn transform_pages(
    pages: &[Value],
    countries: &CountryTable,
    config: &EtlConfig,
) -> PipelineResult<PipelineOutput> {
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();
    log_info(format!("🚀 Run {} (target month {})", run_id, config.target_window));

    let records = restaurant_records(pages);
    log_success(format!("Read {} restaurant record(s) from {} page(s)", records.len(), pages.len()));

    // Validation never stops the run
    let (results_validation, events_validation) = if config.skip_validation {
        log_info("(validation skipped)");
        (None, None)
    } else {
        let results = validate_results_schema(pages);
        let events = validate_events_schema(&event_wrappers(&records));
        (Some(results), Some(events))
    };

    log_info("⚙️  Flattening restaurant records...");
    let raw = parse_restaurant_records(&records)?;
    let mut table = flatten_records(countries, &raw);
    log_success(format!("{} row(s)", table.len()));

    log_info(format!("📅 Selecting events in {}...", config.target_window));
    process_event_data(&mut table, &config.target_window)?;

    let q1 = prepare_q1(&table);
    let q2 = prepare_q2(&table);
    log_success(format!("Q1: {} restaurant(s)", q1.len()));
    log_success(format!("Q2: {} restaurant event(s)", q2.len()));

    let summary = RunSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        target_month: config.target_window.to_string(),
        result_pages: pages.len(),
        restaurant_records: records.len(),
        q1_rows: q1.len(),
        q2_rows: q2.len(),
        results_validation,
        events_validation,
        outputs: Vec::new(),
    };

    Ok(PipelineOutput { table, q1, q2, summary })
}

/// Load the country table named by the configuration, if any.
pub fn load_countries(config: &EtlConfig) -> PipelineResult<CountryTable> {
    match config.country_codes {
        Some(ref path) => {
            let table = load_country_table(path)?;
            log_success(format!("Loaded {} country code(s) from {}", table.len(), path.display()));
            Ok(table)
        }
        None => {
            log_warning("No country code table configured, every country will be NA");
            Ok(CountryTable::new())
        }
    }
}

/// Run the whole pipeline on a restaurant data file and export the views.
pub fn run_pipeline(restaurants: &Path, config: &EtlConfig) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading {}...", restaurants.display()));
    let pages = load_restaurant_pages(restaurants)?;
    let countries = load_countries(config)?;

    let mut output = transform_pages(&pages, &countries, config)?;

    log_info(format!("💾 Writing views to {}...", config.output_dir.display()));
    let q1_path = export_view(&config.output_dir, Q1_FILE_STEM, config.output_format, &output.q1)?;
    let q2_path = export_view(&config.output_dir, Q2_FILE_STEM, config.output_format, &output.q2)?;
    let summary_path = config.output_dir.join(RUN_SUMMARY_FILE);

    output.summary.outputs = vec![q1_path, q2_path, summary_path.clone()];
    output.summary.finished_at = Utc::now();
    write_json(&summary_path, &output.summary)?;

    for path in &output.summary.outputs {
        log_success(format!("→ {}", path.display()));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::constants::NA_VALUE;
    use crate::error::{PipelineError, TransformError};
    use serde_json::json;
    use tempfile::tempdir;

    fn restaurant(res_id: i64, events: Option<Value>) -> Value {
        let mut restaurant = json!({
            "R": { "res_id": res_id },
            "name": format!("R{}", res_id),
            "location": { "country_id": 1, "city": "X" },
            "user_rating": { "votes": "10", "aggregate_rating": "4.0", "rating_text": "Good" },
            "cuisines": "Italian"
        });
        if let Some(events) = events {
            restaurant["zomato_events"] = events;
        }
        json!({ "restaurant": restaurant })
    }

    fn event(id: i64, start: &str, end: &str) -> Value {
        json!({ "event": {
            "event_id": id,
            "title": "Live\tMusic\n",
            "start_date": start,
            "end_date": end,
            "photos": []
        }})
    }

    fn page(restaurants: Vec<Value>) -> Value {
        json!({
            "results_found": restaurants.len(),
            "results_start": 0,
            "results_shown": restaurants.len(),
            "restaurants": restaurants
        })
    }

    fn countries() -> CountryTable {
        [(1, "India")].into_iter().collect()
    }

    #[test]
    fn test_scenario_record_without_events() {
        let pages = vec![json!({
            "results_found": 1, "results_start": 0, "results_shown": 1,
            "restaurants": [{"restaurant": {
                "R": {"res_id": 1}, "name": "A",
                "location": {"country_id": 1, "city": "X"},
                "user_rating": {"votes": "10", "aggregate_rating": "4.0", "rating_text": "Good"},
                "cuisines": "Italian"
            }}]
        })];

        let output = transform_pages(&pages, &countries(), &EtlConfig::default()).unwrap();

        let row = &output.table.rows[0];
        assert_eq!(row.country.as_deref(), Some("India"));
        assert!(row.event.cells().iter().all(|c| c.as_deref() == Some(NA_VALUE)));
        assert_eq!(output.q1.len(), 1);
        assert_eq!(output.q1[0].restaurant_name, "A");
        assert!(output.q2.is_empty());
    }

    #[test]
    fn test_q2_from_mixed_pages() {
        let pages = vec![
            page(vec![
                restaurant(1, Some(json!([event(10, "2019-03-31", "2019-04-30"), event(11, "2019-04-01", "2019-04-30")]))),
                restaurant(2, None),
            ]),
            page(vec![restaurant(3, Some(json!([event(30, "2019-04-05", "2019-04-05")])))]),
        ];

        let output = transform_pages(&pages, &countries(), &EtlConfig::default()).unwrap();
        assert_eq!(output.summary.result_pages, 2);
        assert_eq!(output.summary.restaurant_records, 3);
        assert_eq!(output.q1.len(), 3);

        let ids: Vec<(&str, &str)> = output
            .q2
            .iter()
            .map(|r| (r.restaurant_id.as_str(), r.event_id.as_str()))
            .collect();
        assert_eq!(ids, vec![("1", "11"), ("3", "30")]);
        assert_eq!(output.q2[0].event_title, "LiveMusic");
        assert_eq!(output.q2[0].photo_url, NA_VALUE);
        assert!(output.summary.results_validation.as_ref().unwrap().passed);
        assert!(output.summary.events_validation.as_ref().unwrap().passed);
    }

    #[test]
    fn test_validation_failure_is_not_fatal() {
        let mut bad = restaurant(1, None);
        bad["restaurant"]["user_rating"]["rating_text"] = json!(5);
        let pages = vec![page(vec![bad])];

        let output = transform_pages(&pages, &countries(), &EtlConfig::default()).unwrap();
        assert!(!output.summary.results_validation.unwrap().passed);
        assert_eq!(output.q1[0].restaurant_id, "1");
    }

    #[test]
    fn test_null_cuisines_filled_in_q1() {
        let mut record = restaurant(1, None);
        record["restaurant"]["cuisines"] = Value::Null;
        let pages = vec![page(vec![record, restaurant(2, None)])];
        let config = EtlConfig { skip_validation: true, ..EtlConfig::default() };

        let output = transform_pages(&pages, &countries(), &config).unwrap();
        assert_eq!(output.q1.len(), 2);
        assert_eq!(output.q1[0].cuisines, NA_VALUE);
        assert_eq!(output.q1[0].restaurant_name, "R1");
        assert_eq!(output.q1[1].cuisines, "Italian");
    }

    #[test]
    fn test_broken_event_after_match_is_ignored() {
        let june_without_photos = json!({ "event": {
            "event_id": 99, "title": "June", "start_date": "2019-06-01", "end_date": "2019-06-02"
        }});
        let pages = vec![page(vec![restaurant(
            1,
            Some(json!([event(10, "2019-04-02", "2019-04-03"), june_without_photos])),
        )])];
        let config = EtlConfig { skip_validation: true, ..EtlConfig::default() };

        let output = transform_pages(&pages, &countries(), &config).unwrap();
        assert_eq!(output.q2.len(), 1);
        assert_eq!(output.q2[0].event_id, "10");
    }

    #[test]
    fn test_malformed_date_aborts_batch() {
        let pages = vec![page(vec![
            restaurant(1, None),
            restaurant(2, Some(json!([event(20, "2019/04/02", "2019-04-02")]))),
        ])];
        let config = EtlConfig { skip_validation: true, ..EtlConfig::default() };

        let err = transform_pages(&pages, &countries(), &config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transform(TransformError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn test_run_pipeline_writes_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("restaurant_data.json");
        let countries_path = dir.path().join("Country-Code.csv");
        let out = dir.path().join("out");

        let pages = json!([page(vec![
            restaurant(1, Some(json!([event(10, "2019-04-02", "2019-04-03")]))),
            restaurant(2, None),
        ])]);
        std::fs::write(&input, pages.to_string()).unwrap();
        std::fs::write(&countries_path, "Country Code,Country\n1,India\n").unwrap();

        let config = EtlConfig {
            output_dir: out.clone(),
            output_format: OutputFormat::Csv,
            country_codes: Some(countries_path),
            ..EtlConfig::default()
        };
        let output = run_pipeline(&input, &config).unwrap();

        assert_eq!(output.summary.outputs.len(), 3);
        let q1 = std::fs::read_to_string(out.join("restaurants.csv")).unwrap();
        assert_eq!(q1.lines().count(), 3);
        assert!(q1.contains("India"));

        let q2 = std::fs::read_to_string(out.join("restaurant_events.csv")).unwrap();
        assert_eq!(q2.lines().count(), 2);

        let summary: Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("run_summary.json")).unwrap()).unwrap();
        assert_eq!(summary["q2Rows"], 1);
        assert_eq!(summary["targetMonth"], "2019-04");
    }
}
