//! Country code to country name lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::NA_VALUE;

/// Static `{ country code : country name }` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryTable {
    names: HashMap<i64, String>,
}

impl CountryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: i64, name: impl Into<String>) {
        self.names.insert(code, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name mapped to `code`, if any.
    pub fn get(&self, code: i64) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Name mapped to `code`, or [`NA_VALUE`] for unknown codes.
    pub fn country_name(&self, code: i64) -> &str {
        self.get(code).unwrap_or(NA_VALUE)
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for CountryTable {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(code, name)| (code, name.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        let table: CountryTable = [(1, "India"), (216, "United States")].into_iter().collect();
        assert_eq!(table.country_name(1), "India");
        assert_eq!(table.country_name(216), "United States");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unknown_code_is_sentinel() {
        let table: CountryTable = [(1, "India")].into_iter().collect();
        assert_eq!(table.country_name(14), NA_VALUE);
        assert_eq!(table.get(14), None);
        assert_eq!(CountryTable::new().country_name(1), NA_VALUE);
    }
}
