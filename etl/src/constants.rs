//! Fixed column names and sentinels.
//!
//! Every stage of the pipeline reads these values from here; exported files
//! must use exactly these headers and placeholders.

// =============================================================================
// Sentinels
// =============================================================================

/// Placeholder written wherever a value is missing.
pub const NA_VALUE: &str = "NA";

/// Marker stored in the events cell of a restaurant without a `zomato_events` key.
pub const EMPTY_EVENTS_CELL: &str = "[]";

/// Number of event columns filled by the event extractor.
pub const NUM_OF_EVENTS_COLUMNS: usize = 7;

/// Key holding the event list inside a raw restaurant object.
pub const EVENTS_KEY: &str = "zomato_events";

// =============================================================================
// Restaurant columns
// =============================================================================

pub const RESTAURANT_ID: &str = "Restaurant Id";
pub const RESTAURANT_NAME: &str = "Restaurant Name";
pub const COUNTRY: &str = "Country";
pub const CITY: &str = "City";
pub const USER_RATING_VOTES: &str = "User Rating Votes";
pub const USER_AGGREGATE_RATING: &str = "User Aggregate Rating";
pub const CUISINES: &str = "Cuisines";
pub const COUNTRY_ID: &str = "Country Id";
pub const RATING_TEXT: &str = "Rating Text";

// =============================================================================
// Event columns
// =============================================================================

pub const EVENTS: &str = "Events";
pub const EVENT_ID: &str = "Event Id";
pub const PHOTO_URL: &str = "Photo URL";
pub const EVENT_TITLE: &str = "Event Title";
pub const EVENT_START_DATE: &str = "Event Start Date";
pub const EVENT_END_DATE: &str = "Event End Date";
pub const EVENT_START_DATE_DT: &str = "Event Start Date Dt";
pub const EVENT_END_DATE_DT: &str = "Event End Date Dt";

// =============================================================================
// Dates
// =============================================================================

/// Format of every date string in the source data.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default target window: April 2019.
pub const DEFAULT_TARGET_YEAR: i32 = 2019;
pub const DEFAULT_TARGET_MONTH: u32 = 4;

// =============================================================================
// Output files
// =============================================================================

/// Base name of the Q1 export.
pub const Q1_FILE_STEM: &str = "restaurants";

/// Base name of the Q2 export.
pub const Q2_FILE_STEM: &str = "restaurant_events";

/// Name of the per-run summary file.
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";
