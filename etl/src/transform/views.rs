//! Reporting views over the finished table.
//!
//! - Q1: one line per restaurant, restaurant columns only
//! - Q2: one line per restaurant with an event in the target window
//!
//! Both read the table without touching it and write the sentinel into
//! every unset cell of their output.

use serde::{Deserialize, Serialize};

use super::template::{RestaurantTable, Row};
use crate::constants::*;

/// A line of an exported view, with its fixed header row.
pub trait ViewRow: Serialize {
    const HEADERS: &'static [&'static str];
}

fn text(cell: &Option<String>) -> String {
    cell.clone().unwrap_or_else(|| NA_VALUE.to_string())
}

fn integer(cell: Option<i64>) -> String {
    cell.map(|v| v.to_string()).unwrap_or_else(|| NA_VALUE.to_string())
}

fn filled(cell: Option<String>) -> String {
    cell.unwrap_or_else(|| NA_VALUE.to_string())
}

/// A line of the Q1 (restaurants) view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Q1Row {
    #[serde(rename = "Restaurant Id")]
    pub restaurant_id: String,
    #[serde(rename = "Restaurant Name")]
    pub restaurant_name: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "User Rating Votes")]
    pub user_rating_votes: String,
    #[serde(rename = "User Aggregate Rating")]
    pub user_aggregate_rating: String,
    #[serde(rename = "Cuisines")]
    pub cuisines: String,
}

impl ViewRow for Q1Row {
    const HEADERS: &'static [&'static str] = &[
        RESTAURANT_ID,
        RESTAURANT_NAME,
        COUNTRY,
        CITY,
        USER_RATING_VOTES,
        USER_AGGREGATE_RATING,
        CUISINES,
    ];
}

impl From<&Row> for Q1Row {
    fn from(row: &Row) -> Self {
        Self {
            restaurant_id: integer(row.restaurant_id),
            restaurant_name: text(&row.restaurant_name),
            country: text(&row.country),
            city: text(&row.city),
            user_rating_votes: text(&row.user_rating_votes),
            user_aggregate_rating: text(&row.user_aggregate_rating),
            cuisines: text(&row.cuisines),
        }
    }
}

/// A line of the Q2 (restaurant events) view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Q2Row {
    #[serde(rename = "Event Id")]
    pub event_id: String,
    #[serde(rename = "Restaurant Id")]
    pub restaurant_id: String,
    #[serde(rename = "Restaurant Name")]
    pub restaurant_name: String,
    #[serde(rename = "Photo URL")]
    pub photo_url: String,
    #[serde(rename = "Event Title")]
    pub event_title: String,
    #[serde(rename = "Event Start Date")]
    pub event_start_date: String,
    #[serde(rename = "Event End Date")]
    pub event_end_date: String,
}

impl ViewRow for Q2Row {
    const HEADERS: &'static [&'static str] = &[
        EVENT_ID,
        RESTAURANT_ID,
        RESTAURANT_NAME,
        PHOTO_URL,
        EVENT_TITLE,
        EVENT_START_DATE,
        EVENT_END_DATE,
    ];
}

impl From<&Row> for Q2Row {
    fn from(row: &Row) -> Self {
        let [event_id, photo_url, title, start, end, _, _] = row.event.cells();
        Self {
            event_id: filled(event_id),
            restaurant_id: integer(row.restaurant_id),
            restaurant_name: text(&row.restaurant_name),
            photo_url: filled(photo_url),
            event_title: filled(title),
            event_start_date: filled(start),
            event_end_date: filled(end),
        }
    }
}

/// Q1: every restaurant, no event columns.
pub fn prepare_q1(table: &RestaurantTable) -> Vec<Q1Row> {
    table.iter().map(Q1Row::from).collect()
}

/// Q2: restaurants whose event title is not the sentinel, in table order.
pub fn prepare_q2(table: &RestaurantTable) -> Vec<Q2Row> {
    table
        .iter()
        .map(Q2Row::from)
        .filter(|row| row.event_title != NA_VALUE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::template::{EventColumns, EventsCell, SelectedEvent};
    use chrono::NaiveDate;

    fn restaurant(id: i64, event: EventColumns) -> Row {
        Row {
            restaurant_id: Some(id),
            restaurant_name: Some(format!("R{}", id)),
            country: Some("India".into()),
            city: Some("X".into()),
            user_rating_votes: Some("10".into()),
            user_aggregate_rating: Some("4.0".into()),
            cuisines: Some("Italian".into()),
            country_id: Some(1),
            rating_text: Some("Good".into()),
            events: EventsCell::Empty,
            event,
        }
    }

    fn selected(id: &str) -> EventColumns {
        let day = NaiveDate::from_ymd_opt(2019, 4, 2).unwrap();
        EventColumns::Selected(SelectedEvent {
            event_id: id.into(),
            photo_url: "https://img/1.jpg".into(),
            title: format!("Event {}", id),
            start_date: "2019-04-02".into(),
            end_date: "2019-04-02".into(),
            start_date_dt: day,
            end_date_dt: day,
        })
    }

    fn table() -> RestaurantTable {
        RestaurantTable {
            rows: vec![
                restaurant(1, EventColumns::NotAvailable),
                restaurant(2, selected("e2")),
                restaurant(3, EventColumns::NotAvailable),
                restaurant(4, selected("e4")),
            ],
        }
    }

    #[test]
    fn test_q1_keeps_every_row() {
        let q1 = prepare_q1(&table());
        assert_eq!(q1.len(), 4);
        assert_eq!(q1[0].restaurant_id, "1");
        assert_eq!(q1[0].country, "India");
    }

    #[test]
    fn test_q1_has_no_event_columns() {
        let json = serde_json::to_value(&prepare_q1(&table())[1]).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 7);
        assert!(json.get("Event Title").is_none());
        assert!(json.get("Events").is_none());
    }

    #[test]
    fn test_q2_only_rows_with_events() {
        let q2 = prepare_q2(&table());
        assert_eq!(q2.len(), 2);
        assert_eq!(q2[0].event_id, "e2");
        assert_eq!(q2[0].restaurant_id, "2");
        assert_eq!(q2[1].event_id, "e4");
        assert!(q2.iter().all(|r| r.event_title != NA_VALUE));
    }

    #[test]
    fn test_unset_cells_become_sentinel() {
        let mut row = Row::template();
        row.restaurant_id = Some(8);
        let table = RestaurantTable { rows: vec![row] };

        let q1 = prepare_q1(&table);
        assert_eq!(q1[0].restaurant_name, NA_VALUE);
        assert_eq!(q1[0].cuisines, NA_VALUE);
        assert!(prepare_q2(&table).is_empty());
    }

    #[test]
    fn test_headers_match_serialized_keys() {
        let json = serde_json::to_value(&prepare_q2(&table())[0]).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for header in Q2Row::HEADERS {
            assert!(keys.contains(header));
        }
        assert_eq!(keys.len(), Q2Row::HEADERS.len());
    }

    #[test]
    fn test_projection_idempotent() {
        let table = table();
        assert_eq!(prepare_q1(&table), prepare_q1(&table));
        assert_eq!(prepare_q2(&table), prepare_q2(&table));
    }
}
