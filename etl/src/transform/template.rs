//! Intermediate table layout.
//!
//! ```text
//! Restaurant Id | Restaurant Name | Country | City | Votes | Rating | Cuisines
//! Country Id | Rating Text | Photo URL | Events | Event Id | Event Title
//! Event Start Date | Event End Date | Event Start Date Dt | Event End Date Dt
//! ```
//!
//! A [`Row`] starts from [`Row::template`] with every cell unset, receives
//! its restaurant cells from the flattener and its seven event cells from
//! the event extractor. The event cells live in one [`EventColumns`] value,
//! so they are always all set or all sentinel.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::constants::*;

// =============================================================================
// Columns
// =============================================================================

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Text,
    Date,
    /// Raw nested JSON kept as-is.
    Object,
}

/// Every column of the intermediate table, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    RestaurantId,
    RestaurantName,
    Country,
    City,
    UserRatingVotes,
    UserAggregateRating,
    Cuisines,
    CountryId,
    RatingText,
    PhotoUrl,
    Events,
    EventId,
    EventTitle,
    EventStartDate,
    EventEndDate,
    EventStartDateDt,
    EventEndDateDt,
}

impl Column {
    pub const ALL: [Column; 17] = [
        Column::RestaurantId,
        Column::RestaurantName,
        Column::Country,
        Column::City,
        Column::UserRatingVotes,
        Column::UserAggregateRating,
        Column::Cuisines,
        Column::CountryId,
        Column::RatingText,
        Column::PhotoUrl,
        Column::Events,
        Column::EventId,
        Column::EventTitle,
        Column::EventStartDate,
        Column::EventEndDate,
        Column::EventStartDateDt,
        Column::EventEndDateDt,
    ];

    /// Columns written by the event extractor.
    pub const EVENT_COLUMNS: [Column; NUM_OF_EVENTS_COLUMNS] = [
        Column::EventId,
        Column::PhotoUrl,
        Column::EventTitle,
        Column::EventStartDate,
        Column::EventEndDate,
        Column::EventStartDateDt,
        Column::EventEndDateDt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::RestaurantId => RESTAURANT_ID,
            Column::RestaurantName => RESTAURANT_NAME,
            Column::Country => COUNTRY,
            Column::City => CITY,
            Column::UserRatingVotes => USER_RATING_VOTES,
            Column::UserAggregateRating => USER_AGGREGATE_RATING,
            Column::Cuisines => CUISINES,
            Column::CountryId => COUNTRY_ID,
            Column::RatingText => RATING_TEXT,
            Column::PhotoUrl => PHOTO_URL,
            Column::Events => EVENTS,
            Column::EventId => EVENT_ID,
            Column::EventTitle => EVENT_TITLE,
            Column::EventStartDate => EVENT_START_DATE,
            Column::EventEndDate => EVENT_END_DATE,
            Column::EventStartDateDt => EVENT_START_DATE_DT,
            Column::EventEndDateDt => EVENT_END_DATE_DT,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::RestaurantId | Column::CountryId => ColumnKind::Integer,
            Column::Events => ColumnKind::Object,
            Column::EventStartDateDt | Column::EventEndDateDt => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }
}

// =============================================================================
// Cells
// =============================================================================

/// Raw event list attached to a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventsCell {
    /// Not yet written.
    #[default]
    Unset,
    /// The restaurant has no `zomato_events` key.
    Empty,
    /// The restaurant's event list, verbatim and undecoded.
    Listed(Vec<Value>),
}

impl EventsCell {
    fn to_json(&self) -> Value {
        match self {
            EventsCell::Unset => Value::Null,
            EventsCell::Empty => json!(EMPTY_EVENTS_CELL),
            EventsCell::Listed(events) => json!(events),
        }
    }
}

/// The event picked for a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedEvent {
    pub event_id: String,
    /// First photo URL, or the sentinel for photo-less events.
    pub photo_url: String,
    /// Title with newlines and tabs removed.
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub start_date_dt: NaiveDate,
    pub end_date_dt: NaiveDate,
}

/// The seven event cells of a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventColumns {
    /// Not yet written.
    #[default]
    Unset,
    /// No event inside the target window.
    NotAvailable,
    Selected(SelectedEvent),
}

impl EventColumns {
    pub fn selected(&self) -> Option<&SelectedEvent> {
        match self {
            EventColumns::Selected(event) => Some(event),
            _ => None,
        }
    }

    /// Cells in [`Column::EVENT_COLUMNS`] order; `None` while unset.
    pub fn cells(&self) -> [Option<String>; NUM_OF_EVENTS_COLUMNS] {
        match self {
            EventColumns::Unset => Default::default(),
            EventColumns::NotAvailable => std::array::from_fn(|_| Some(NA_VALUE.to_string())),
            EventColumns::Selected(e) => [
                Some(e.event_id.clone()),
                Some(e.photo_url.clone()),
                Some(e.title.clone()),
                Some(e.start_date.clone()),
                Some(e.end_date.clone()),
                Some(e.start_date_dt.format(DATE_FORMAT).to_string()),
                Some(e.end_date_dt.format(DATE_FORMAT).to_string()),
            ],
        }
    }
}

// =============================================================================
// Row
// =============================================================================

/// One flattened restaurant record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub restaurant_id: Option<i64>,
    pub restaurant_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub user_rating_votes: Option<String>,
    pub user_aggregate_rating: Option<String>,
    pub cuisines: Option<String>,
    pub country_id: Option<i64>,
    pub rating_text: Option<String>,
    pub events: EventsCell,
    pub event: EventColumns,
}

impl Row {
    /// A row with every cell unset.
    pub fn template() -> Self {
        Self::default()
    }

    /// Row as a JSON object keyed by column name. Unset cells are `null`.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        let [event_id, photo_url, title, start, end, start_dt, end_dt] = self.event.cells();

        for column in Column::ALL {
            let value = match column {
                Column::RestaurantId => json!(self.restaurant_id),
                Column::RestaurantName => json!(self.restaurant_name),
                Column::Country => json!(self.country),
                Column::City => json!(self.city),
                Column::UserRatingVotes => json!(self.user_rating_votes),
                Column::UserAggregateRating => json!(self.user_aggregate_rating),
                Column::Cuisines => json!(self.cuisines),
                Column::CountryId => json!(self.country_id),
                Column::RatingText => json!(self.rating_text),
                Column::PhotoUrl => json!(photo_url),
                Column::Events => self.events.to_json(),
                Column::EventId => json!(event_id),
                Column::EventTitle => json!(title),
                Column::EventStartDate => json!(start),
                Column::EventEndDate => json!(end),
                Column::EventStartDateDt => json!(start_dt),
                Column::EventEndDateDt => json!(end_dt),
            };
            obj.insert(column.name().to_string(), value);
        }

        Value::Object(obj)
    }
}

// =============================================================================
// Table
// =============================================================================

/// The intermediate restaurant table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantTable {
    pub rows: Vec<Row>,
}

impl RestaurantTable {
    /// An empty table with the template columns.
    pub fn template() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &'static [Column] {
        &Column::ALL
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.rows.iter().map(Row::to_json).collect())
    }
}
