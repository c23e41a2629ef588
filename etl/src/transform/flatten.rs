//! Restaurant records into table rows.
//!
//! One row per record, in input order. Only the restaurant cells and the raw
//! events cell are written here; the event cells stay unset until
//! [`super::events::process_event_data`] runs.

use serde_json::Value;

use super::country::CountryTable;
use super::template::{EventsCell, RestaurantTable, Row};
use crate::error::TransformResult;
use crate::models::{RawRecord, Text};

/// Decode raw JSON records. The first malformed record aborts the batch.
pub fn parse_restaurant_records(values: &[Value]) -> TransformResult<Vec<RawRecord>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| RawRecord::from_value(index, value))
        .collect()
}

/// Build the intermediate table from decoded records.
pub fn flatten_records(countries: &CountryTable, records: &[RawRecord]) -> RestaurantTable {
    let mut table = RestaurantTable::template();
    table.rows.reserve(records.len());

    for record in records {
        table.rows.push(flatten_record(countries, record));
    }

    table
}

fn text(value: &Option<Text>) -> Option<String> {
    value.as_ref().map(|t| t.0.clone())
}

/// Fill the restaurant cells of a template row. `null` values stay unset.
pub fn flatten_record(countries: &CountryTable, record: &RawRecord) -> Row {
    let restaurant = &record.restaurant;
    let country_id = restaurant.location.country_id;

    let mut row = Row::template();
    row.restaurant_id = Some(restaurant.key.res_id);
    row.restaurant_name = restaurant.name.clone();
    row.country_id = Some(country_id);
    row.city = restaurant.location.city.clone();
    row.user_rating_votes = text(&restaurant.user_rating.votes);
    row.user_aggregate_rating = text(&restaurant.user_rating.aggregate_rating);
    row.cuisines = restaurant.cuisines.clone();
    row.rating_text = text(&restaurant.user_rating.rating_text);
    row.country = Some(countries.country_name(country_id).to_string());

    // Some restaurants carry no zomato_events key at all
    row.events = match &restaurant.zomato_events {
        Some(events) => EventsCell::Listed(events.clone()),
        None => EventsCell::Empty,
    };

    row
}
