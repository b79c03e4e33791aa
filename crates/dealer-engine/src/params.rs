//! The parameter bag shared by fetches and analytics.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::EngineError;

const DATE_RANGE_KEY: &str = "dateRange";
const SEARCH_KEY: &str = "search";
const START_DATE_KEY: &str = "startDate";
const END_DATE_KEY: &str = "endDate";

/// Filter value that disables a field filter in dropdown-driven UIs.
const ALL_SENTINEL: &str = "All";

/// Date range, free-text search and per-field filters.
///
/// Parsed from the JSON object a UI sends. The reserved keys `dateRange`,
/// `search`, `startDate` and `endDate` are lifted out; every other key is an
/// exact-match field filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// Symbolic range name such as `this_month`.
    pub date_range: Option<String>,
    /// Explicit start for a custom range.
    pub start_date: Option<DateTime<Utc>>,
    /// Explicit end for a custom range.
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive free-text search.
    pub search: Option<String>,
    /// Field filters in the order they were supplied.
    pub fields: IndexMap<String, Value>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON parameter bag. `null` means no filters.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(EngineError::InvalidParameters(format!(
                "expected an object, got {}",
                json_type(other)
            ))),
        }
    }

    /// Parse a JSON object. Unusable reserved values are dropped so the
    /// corresponding filter falls back to matching everything.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut params = Self::default();

        for (key, value) in map {
            match key.as_str() {
                DATE_RANGE_KEY => params.date_range = string_value(key, value),
                SEARCH_KEY => params.search = string_value(key, value),
                START_DATE_KEY => params.start_date = date_value(key, value),
                END_DATE_KEY => params.end_date = date_value(key, value),
                _ => {
                    params.fields.insert(key.clone(), value.clone());
                }
            }
        }

        params
    }

    pub fn with_date_range(mut self, range: impl Into<String>) -> Self {
        self.date_range = Some(range.into());
        self
    }

    pub fn with_custom_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_range = Some("custom".to_string());
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Field filters that actually constrain results.
    ///
    /// Empty strings, `"All"` and `null` switch a filter off.
    pub fn active_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(_, value)| is_active(value))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Search text, if any non-blank text was supplied.
    pub fn active_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
    }
}

fn is_active(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty() && s != ALL_SENTINEL,
        _ => true,
    }
}

fn string_value(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => {
            warn!("Ignoring non-string {} parameter: {}", key, other);
            None
        }
    }
}

fn date_value(key: &str, value: &Value) -> Option<DateTime<Utc>> {
    let raw = string_value(key, value)?;
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unparseable {} {:?}: {}", key, raw, e);
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_keys_are_lifted() {
        let params = FilterParams::from_value(&json!({
            "dateRange": "last_30_days",
            "search": "ford",
            "status": "New",
            "approved": true
        }))
        .unwrap();

        assert_eq!(params.date_range.as_deref(), Some("last_30_days"));
        assert_eq!(params.active_search(), Some("ford"));
        assert_eq!(params.fields.len(), 2);
        assert_eq!(params.fields["approved"], json!(true));
    }

    #[test]
    fn test_inactive_field_values() {
        let params = FilterParams::new()
            .with_field("status", "All")
            .with_field("source", "")
            .with_field("category", Value::Null)
            .with_field("approved", false)
            .with_field("priority", "High");

        let active: Vec<&str> = params.active_fields().map(|(k, _)| k).collect();
        assert_eq!(active, vec!["approved", "priority"]);
    }

    #[test]
    fn test_custom_dates() {
        let params = FilterParams::from_value(&json!({
            "dateRange": "custom",
            "startDate": "2024-01-01T00:00:00Z",
            "endDate": "not a date"
        }))
        .unwrap();

        assert!(params.start_date.is_some());
        assert!(params.end_date.is_none());
    }

    #[test]
    fn test_blank_search_is_inactive() {
        let params = FilterParams::new().with_search("   ");
        assert_eq!(params.active_search(), None);
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(FilterParams::from_value(&Value::Null).is_ok());
        assert!(matches!(
            FilterParams::from_value(&json!(["status"])),
            Err(EngineError::InvalidParameters(_))
        ));
    }
}
