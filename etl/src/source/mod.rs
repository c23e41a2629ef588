//! Input loading with encoding auto-detection.
//!
//! - restaurant data: a JSON array of search result pages (or one page)
//! - country reference table: CSV with `Country Code` / `Country` headers,
//!   or JSON (`{"1": "India"}` or an array of `{"Country Code", "Country"}`)
//!
//! Helpers also pull the nested restaurant records and event wrappers out of
//! the raw pages for the validators and the flattener.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::constants::EVENTS_KEY;
use crate::error::{SourceError, SourceResult};
use crate::transform::country::CountryTable;

/// Decoded file content with the encoding it was read as
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub content: String,
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> SourceResult<String> {
    let table = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => encoding_rs::UTF_8,
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes()).unwrap_or(encoding_rs::UTF_8),
    };

    let (content, _, had_errors) = table.decode(bytes);
    if had_errors {
        return Err(SourceError::EncodingError { encoding: encoding.to_string() });
    }
    Ok(content.into_owned())
}

/// Decode bytes, preferring UTF-8 whenever the bytes are valid UTF-8.
pub fn decode_bytes_auto(bytes: &[u8]) -> SourceResult<DecodedText> {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return Ok(DecodedText {
            content: content.trim_start_matches('\u{feff}').to_string(),
            encoding: "utf-8".to_string(),
        });
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    Ok(DecodedText { content, encoding })
}

/// Read a file with encoding auto-detection.
pub fn read_text<P: AsRef<Path>>(path: P) -> SourceResult<DecodedText> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_bytes_auto(&bytes)
}

// =============================================================================
// Restaurant data
// =============================================================================

/// Parse restaurant data into a list of result pages.
pub fn parse_restaurant_pages(content: &str) -> SourceResult<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(pages) => Ok(pages),
        page @ Value::Object(_) if page.get("restaurants").is_some() => Ok(vec![page]),
        other => Err(SourceError::UnexpectedShape(format!(
            "expected an array of result pages, found {}",
            json_kind(&other)
        ))),
    }
}

/// Load restaurant data from a JSON file.
pub fn load_restaurant_pages<P: AsRef<Path>>(path: P) -> SourceResult<Vec<Value>> {
    let decoded = read_text(path)?;
    parse_restaurant_pages(&decoded.content)
}

/// All `{"restaurant": {...}}` entries of every page, in page order.
pub fn restaurant_records(pages: &[Value]) -> Vec<Value> {
    pages
        .iter()
        .filter_map(|page| page.get("restaurants").and_then(Value::as_array))
        .flatten()
        .cloned()
        .collect()
}

/// All `{"event": {...}}` wrappers of every restaurant, in record order.
pub fn event_wrappers(records: &[Value]) -> Vec<Value> {
    records
        .iter()
        .filter_map(|record| {
            record
                .get("restaurant")
                .and_then(|r| r.get(EVENTS_KEY))
                .and_then(Value::as_array)
        })
        .flatten()
        .cloned()
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Country reference table
// =============================================================================

#[derive(Debug, Deserialize)]
struct CountryEntry {
    #[serde(rename = "Country Code")]
    code: i64,
    #[serde(rename = "Country")]
    name: String,
}

/// Parse a CSV country table with `Country Code` and `Country` headers.
pub fn parse_country_csv(content: &str) -> SourceResult<CountryTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut table = CountryTable::new();
    for entry in reader.deserialize::<CountryEntry>() {
        let entry = entry?;
        table.insert(entry.code, entry.name);
    }
    Ok(table)
}

/// Parse a JSON country table: a code→name object or a list of entries.
pub fn parse_country_json(content: &str) -> SourceResult<CountryTable> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => {
            let mut table = CountryTable::new();
            for (code, name) in map {
                let code: i64 = code.trim().parse().map_err(|_| {
                    SourceError::UnexpectedShape(format!("country code '{}' is not an integer", code))
                })?;
                let name = name.as_str().ok_or_else(|| {
                    SourceError::UnexpectedShape(format!("country name for {} is not a string", code))
                })?;
                table.insert(code, name);
            }
            Ok(table)
        }
        entries @ Value::Array(_) => {
            let entries: Vec<CountryEntry> = serde_json::from_value(entries)?;
            Ok(entries.into_iter().map(|e| (e.code, e.name)).collect())
        }
        other => Err(SourceError::UnexpectedShape(format!(
            "expected a country object or list, found {}",
            json_kind(&other)
        ))),
    }
}

/// Load the country table, picking the parser from the file extension.
pub fn load_country_table<P: AsRef<Path>>(path: P) -> SourceResult<CountryTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let decoded = read_text(path)?;
    match extension.as_str() {
        "csv" => parse_country_csv(&decoded.content),
        "json" => parse_country_json(&decoded.content),
        _ => Err(SourceError::UnsupportedCountryFile(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_decode_latin1() {
        // "Bogotá" in ISO-8859-1
        let bytes = b"Bogot\xe1";
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Bogotá");
    }

    #[test]
    fn test_decode_auto_prefers_utf8() {
        let decoded = decode_bytes_auto("\u{feff}[1]".as_bytes()).unwrap();
        assert_eq!(decoded.encoding, "utf-8");
        assert_eq!(decoded.content, "[1]");
    }

    #[test]
    fn test_parse_pages() {
        let pages = parse_restaurant_pages(r#"[{"restaurants": []}, {"restaurants": []}]"#).unwrap();
        assert_eq!(pages.len(), 2);

        let single = parse_restaurant_pages(r#"{"restaurants": []}"#).unwrap();
        assert_eq!(single.len(), 1);

        assert!(matches!(
            parse_restaurant_pages("42"),
            Err(SourceError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_records_and_event_wrappers() {
        let pages = vec![
            json!({ "restaurants": [
                { "restaurant": { "name": "a", "zomato_events": [{ "event": { "event_id": 1 } }] } },
                { "restaurant": { "name": "b" } }
            ]}),
            json!({ "restaurants": [
                { "restaurant": { "name": "c", "zomato_events": [{ "event": { "event_id": 2 } }, { "event": {} }] } }
            ]}),
        ];

        let records = restaurant_records(&pages);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["restaurant"]["name"], "c");

        let wrappers = event_wrappers(&records);
        assert_eq!(wrappers.len(), 3);
        assert_eq!(wrappers[1]["event"]["event_id"], 2);
    }

    #[test]
    fn test_country_csv() {
        let table = parse_country_csv("Country Code,Country\n1,India\n 216 , United States\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.country_name(216), "United States");
    }

    #[test]
    fn test_country_json_shapes() {
        let object = parse_country_json(r#"{"1": "India", "14": "Australia"}"#).unwrap();
        assert_eq!(object.country_name(14), "Australia");

        let list = parse_country_json(r#"[{"Country Code": 1, "Country": "India"}]"#).unwrap();
        assert_eq!(list.country_name(1), "India");

        assert!(parse_country_json(r#"{"one": "India"}"#).is_err());
    }

    #[test]
    fn test_load_country_table_by_extension() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("Country-Code.csv");
        std::fs::write(&csv_path, "Country Code,Country\n1,India\n").unwrap();
        assert_eq!(load_country_table(&csv_path).unwrap().country_name(1), "India");

        let txt_path = dir.path().join("countries.txt");
        std::fs::write(&txt_path, "1,India").unwrap();
        assert!(matches!(
            load_country_table(&txt_path),
            Err(SourceError::UnsupportedCountryFile(_))
        ));
    }
}
