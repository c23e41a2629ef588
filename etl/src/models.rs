//! Raw records as delivered by the restaurant listing API.
//!
//! - [`RawRecord`] - one `{"restaurant": {...}}` entry of a search page
//! - [`RawRestaurant`] - identity, location, rating, cuisines, events
//! - [`EventWrapper`] / [`RawEvent`] - one `{"event": {...}}` entry
//! - [`Text`] - a value the API sends either as a string or a number
//!
//! A missing nested key fails the whole record, which in turn aborts the
//! batch. A key that is present but `null` decodes to `None` and ends up as
//! the sentinel in the views. Event lists stay raw JSON on the record and
//! are decoded one wrapper at a time while events are scanned.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{TransformError, TransformResult};

// =============================================================================
// Text
// =============================================================================

/// A scalar kept as text.
///
/// Ratings, vote counts and event ids arrive as `"10"` in some responses
/// and `10` in others. Numbers keep their JSON spelling (`4.0` stays `"4.0"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text(s.to_string())
    }
}

/// `null` becomes `None`, but the key must be present.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Num(serde_json::Number),
            Bool(bool),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Text(s),
            Repr::Num(n) => Text(n.to_string()),
            Repr::Bool(b) => Text(b.to_string()),
        })
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// One entry of a search page's `restaurants` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub restaurant: RawRestaurant,
}

impl RawRecord {
    /// Decode a raw JSON record, tagging failures with its position.
    pub fn from_value(index: usize, value: &Value) -> TransformResult<Self> {
        Self::deserialize(value).map_err(|source| TransformError::MalformedRecord { index, source })
    }
}

/// The restaurant object of a [`RawRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRestaurant {
    #[serde(rename = "R")]
    pub key: RestaurantKey,
    #[serde(deserialize_with = "nullable")]
    pub name: Option<String>,
    pub location: Location,
    pub user_rating: UserRating,
    #[serde(deserialize_with = "nullable")]
    pub cuisines: Option<String>,
    /// Absent for restaurants that never listed an event. Kept verbatim.
    pub zomato_events: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantKey {
    pub res_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "nullable")]
    pub city: Option<String>,
    pub country_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRating {
    #[serde(deserialize_with = "nullable")]
    pub votes: Option<Text>,
    #[serde(deserialize_with = "nullable")]
    pub aggregate_rating: Option<Text>,
    #[serde(deserialize_with = "nullable")]
    pub rating_text: Option<Text>,
}

// =============================================================================
// Events
// =============================================================================

/// One entry of a restaurant's `zomato_events` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWrapper {
    pub event: RawEvent,
}

impl EventWrapper {
    /// Decode the `index`-th event wrapper of table row `row`.
    pub fn from_value(row: usize, index: usize, value: &Value) -> TransformResult<Self> {
        Self::deserialize(value).map_err(|source| TransformError::MalformedEvent { row, index, source })
    }
}

/// An event as listed by the API. Dates are unparsed `YYYY-MM-DD` strings.
///
/// Photos stay raw: only the first one is ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_id: Text,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub photos: Vec<Value>,
}

impl RawEvent {
    /// URL of the first photo, `None` when the event has no photos.
    pub fn first_photo_url(&self) -> Result<Option<String>, serde_json::Error> {
        match self.photos.first() {
            Some(first) => Ok(Some(PhotoWrapper::deserialize(first)?.photo.url)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoWrapper {
    pub photo: Photo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
}

// =============================================================================
// Tests
// =============================================================================
