//! Transformation module.
//!
//! - Country: country code lookup
//! - Template: intermediate table layout
//! - Flatten: raw records to rows
//! - Events: target-month event selection
//! - Views: Q1/Q2 projections
//! - Pipeline: end-to-end run

pub mod country;
pub mod events;
pub mod flatten;
pub mod pipeline;
pub mod template;
pub mod views;

pub use country::CountryTable;
pub use events::{clean_title, extract_event, process_event_data};
pub use flatten::{flatten_record, flatten_records, parse_restaurant_records};
pub use pipeline::*;
pub use template::{Column, ColumnKind, EventColumns, EventsCell, RestaurantTable, Row, SelectedEvent};
pub use views::{prepare_q1, prepare_q2, Q1Row, Q2Row, ViewRow};
