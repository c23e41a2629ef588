//! Event selection.
//!
//! For every row, pick the first listed event that falls inside the target
//! window and copy its seven cells into the row. Rows without such an event
//! get the sentinel in all seven cells.
//!
//! Each wrapper is decoded and its dates parsed while scanning, so a
//! malformed event reached before a match aborts the batch. Events after the
//! match are never looked at.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::template::{EventColumns, EventsCell, RestaurantTable, SelectedEvent};
use crate::config::TargetWindow;
use crate::constants::{DATE_FORMAT, NA_VALUE};
use crate::error::{TransformError, TransformResult};
use crate::logs::log_info_indent;
use crate::models::{EventWrapper, RawEvent};

static TITLE_CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\t]").expect("Invalid title pattern"));

/// Remove newlines and tabs from an event title.
pub fn clean_title(title: &str) -> String {
    TITLE_CONTROL_CHARS.replace_all(title, "").into_owned()
}

fn parse_date(row: usize, field: &'static str, value: &str) -> TransformResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| TransformError::InvalidDate {
        row,
        field,
        value: value.to_string(),
        source,
    })
}

fn to_selected(event: RawEvent, photo_url: Option<String>, start: NaiveDate, end: NaiveDate) -> SelectedEvent {
    SelectedEvent {
        event_id: event.event_id.0,
        photo_url: photo_url.unwrap_or_else(|| NA_VALUE.to_string()),
        title: clean_title(&event.title),
        start_date: event.start_date,
        end_date: event.end_date,
        start_date_dt: start,
        end_date_dt: end,
    }
}

/// Select the event cells for one row.
///
/// `row` only labels date errors.
pub fn extract_event(
    events: &EventsCell,
    window: &TargetWindow,
    row: usize,
) -> TransformResult<EventColumns> {
    let listed = match events {
        EventsCell::Listed(listed) => listed,
        EventsCell::Empty | EventsCell::Unset => return Ok(EventColumns::NotAvailable),
    };

    for (index, value) in listed.iter().enumerate() {
        let event = EventWrapper::from_value(row, index, value)?.event;
        let photo_url = event
            .first_photo_url()
            .map_err(|source| TransformError::MalformedEvent { row, index, source })?;
        let start = parse_date(row, "start_date", &event.start_date)?;
        let end = parse_date(row, "end_date", &event.end_date)?;

        if window.contains(start, end) {
            return Ok(EventColumns::Selected(to_selected(event, photo_url, start, end)));
        }
    }

    Ok(EventColumns::NotAvailable)
}

/// Fill the event cells of every row.
pub fn process_event_data(table: &mut RestaurantTable, window: &TargetWindow) -> TransformResult<()> {
    for (index, row) in table.rows.iter_mut().enumerate() {
        row.event = extract_event(&row.events, window, index)?;

        if let Some(event) = row.event.selected() {
            log_info_indent(
                format!(
                    "Restaurant {}: event {} ({} → {})",
                    row.restaurant_id.unwrap_or_default(),
                    event.event_id,
                    event.start_date,
                    event.end_date
                ),
                1,
            );
        }
    }
    Ok(())
}
