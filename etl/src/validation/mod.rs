//! JSON Schema validation for raw listing payloads.
//!
//! Two passes, both fail-fast and logging-only:
//!
//! - [`validate_results_schema`] - search result pages, then every entry of
//!   each page's `restaurants` list
//! - [`validate_events_schema`] - the `event` object of every event wrapper
//!
//! The first failing item is logged with its error detail and ends the pass.
//! Nothing is returned as an error: the caller gets a [`ValidationReport`]
//! and the pipeline carries on either way.
//!
//! # Embedded Schemas
//!
//! Draft 7 schemas are embedded at compile time from `schemas/`:
//! - `results.json`
//! - `restaurant.json`
//! - `event.json`

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::logs::{log_error, log_info, log_success};

static RESULTS_VALIDATOR: Lazy<Validator> =
    Lazy::new(|| compile_embedded(include_str!("../../schemas/results.json")));

static RESTAURANT_VALIDATOR: Lazy<Validator> =
    Lazy::new(|| compile_embedded(include_str!("../../schemas/restaurant.json")));

static EVENT_VALIDATOR: Lazy<Validator> =
    Lazy::new(|| compile_embedded(include_str!("../../schemas/event.json")));

fn compile_embedded(source: &str) -> Validator {
    let schema: Value = serde_json::from_str(source).expect("Invalid embedded schema");
    jsonschema::draft7::new(&schema).expect("Invalid embedded schema")
}

fn collect_errors(validator: &Validator, data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a JSON value against a draft 7 schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error otherwise
///
/// # Example
/// ```ignore
/// use serde_json::json;
/// use restaurant_etl::validation::validate;
///
/// let schema = json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": { "name": { "type": "string" } }
/// });
///
/// assert!(validate(&schema, &json!({ "name": "test" })).is_ok());
/// assert!(validate(&schema, &json!({ "age": 42 })).is_err());
/// ```
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;
    collect_errors(&validator, data)
}

/// Validate one search result page (without its restaurants).
pub fn validate_results_page(data: &Value) -> Result<(), Vec<String>> {
    collect_errors(&RESULTS_VALIDATOR, data)
}

/// Validate one `{"restaurant": {...}}` entry.
pub fn validate_restaurant(data: &Value) -> Result<(), Vec<String>> {
    collect_errors(&RESTAURANT_VALIDATOR, data)
}

/// Validate one event object (the inside of an event wrapper).
pub fn validate_event(data: &Value) -> Result<(), Vec<String>> {
    collect_errors(&EVENT_VALIDATOR, data)
}

// =============================================================================
// Passes
// =============================================================================

/// Where a pass stopped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Index of the top-level item being checked.
    pub item: usize,
    /// Index inside the item's nested list, when a nested entry failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<usize>,
    pub errors: Vec<String>,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub schema: &'static str,
    pub passed: bool,
    /// Top-level items fully checked before the pass ended.
    pub checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ValidationFailure>,
}

impl ValidationReport {
    fn pass(schema: &'static str, checked: usize) -> Self {
        log_success("Data conforms to the schema.");
        Self { schema, passed: true, checked, failure: None }
    }

    fn fail(schema: &'static str, checked: usize, failure: ValidationFailure) -> Self {
        log_error("Data does not conform to the schema.");
        match failure.nested {
            Some(nested) => log_error(format!("Item {}, entry {}: {}", failure.item, nested, failure.errors.join("; "))),
            None => log_error(format!("Item {}: {}", failure.item, failure.errors.join("; "))),
        }
        Self { schema, passed: false, checked, failure: Some(failure) }
    }
}

/// Check result pages and their restaurant entries, stopping at the first failure.
pub fn validate_results_schema(data: &[Value]) -> ValidationReport {
    const SCHEMA: &str = "results";
    log_info(format!("✔️  Validating {} result page(s)...", data.len()));

    for (item, page) in data.iter().enumerate() {
        if let Err(errors) = validate_results_page(page) {
            return ValidationReport::fail(SCHEMA, item, ValidationFailure { item, nested: None, errors });
        }

        let restaurants = page.get("restaurants").and_then(Value::as_array);
        for (nested, restaurant) in restaurants.into_iter().flatten().enumerate() {
            if let Err(errors) = validate_restaurant(restaurant) {
                return ValidationReport::fail(
                    SCHEMA,
                    item,
                    ValidationFailure { item, nested: Some(nested), errors },
                );
            }
        }
    }

    ValidationReport::pass(SCHEMA, data.len())
}

/// Check the `event` object of each event wrapper, stopping at the first failure.
///
/// Wrappers with a missing or empty `event` are skipped.
pub fn validate_events_schema(data: &[Value]) -> ValidationReport {
    const SCHEMA: &str = "events";
    log_info(format!("✔️  Validating {} event(s)...", data.len()));

    for (item, wrapper) in data.iter().enumerate() {
        let event = match wrapper.get("event") {
            Some(event) if !is_empty(event) => event,
            _ => continue,
        };
        if let Err(errors) = validate_event(event) {
            return ValidationReport::fail(SCHEMA, item, ValidationFailure { item, nested: None, errors });
        }
    }

    ValidationReport::pass(SCHEMA, data.len())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn restaurant() -> Value {
        json!({
            "restaurant": {
                "R": { "res_id": 1 },
                "name": "A",
                "location": { "country_id": 1, "city": "X" },
                "user_rating": { "votes": "10", "aggregate_rating": "4.0", "rating_text": "Good" },
                "cuisines": "Italian"
            }
        })
    }

    fn page(restaurants: Vec<Value>) -> Value {
        json!({
            "results_found": restaurants.len(),
            "results_start": 0,
            "results_shown": restaurants.len(),
            "restaurants": restaurants
        })
    }

    fn event(start: &str) -> Value {
        json!({ "event": {
            "event_id": 1,
            "title": "Quiz",
            "start_date": start,
            "end_date": "2019-04-02",
            "photos": [{ "photo": { "url": "https://img/1.jpg" } }]
        }})
    }

    #[test]
    fn test_generic_validate() {
        let schema = json!({ "type": "object", "required": ["name"] });
        assert!(validate(&schema, &json!({ "name": "x" })).is_ok());
        assert!(validate(&schema, &json!({})).is_err());
    }

    #[test]
    fn test_embedded_schemas_compile() {
        assert!(validate_results_page(&json!({})).is_err());
        assert!(validate_restaurant(&json!({})).is_err());
        assert!(validate_event(&json!({})).is_err());
    }

    #[test]
    fn test_valid_restaurant() {
        assert!(validate_restaurant(&restaurant()).is_ok());
    }

    #[test]
    fn test_restaurant_missing_city() {
        let mut value = restaurant();
        value["restaurant"]["location"].as_object_mut().unwrap().remove("city");
        let errors = validate_restaurant(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_results_pass() {
        let data = vec![page(vec![restaurant(), restaurant()]), page(vec![])];
        let report = validate_results_schema(&data);
        assert!(report.passed);
        assert_eq!(report.checked, 2);
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_results_stop_at_first_failure() {
        let mut bad = restaurant();
        bad["restaurant"]["R"]["res_id"] = json!("not a number");
        let data = vec![
            page(vec![restaurant()]),
            page(vec![restaurant(), bad]),
            json!({ "restaurants": "also bad" }),
        ];

        let report = validate_results_schema(&data);
        assert!(!report.passed);
        assert_eq!(report.checked, 1);
        let failure = report.failure.unwrap();
        assert_eq!(failure.item, 1);
        assert_eq!(failure.nested, Some(1));
    }

    #[test]
    fn test_results_page_shape() {
        let report = validate_results_schema(&[json!({ "restaurants": [] })]);
        assert!(!report.passed);
        assert_eq!(report.failure.unwrap().nested, None);
    }

    #[test]
    fn test_events_pass_and_skip_empty() {
        let data = vec![event("2019-04-01"), json!({ "event": {} }), json!({})];
        let report = validate_events_schema(&data);
        assert!(report.passed);
        assert_eq!(report.checked, 3);
    }

    #[test]
    fn test_events_bad_date() {
        let data = vec![event("2019-04-01"), event("1st April"), event("also bad")];
        let report = validate_events_schema(&data);
        assert!(!report.passed);
        assert_eq!(report.failure.unwrap().item, 1);
    }
}
