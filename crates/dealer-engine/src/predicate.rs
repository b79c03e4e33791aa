//! Per-item inclusion tests built from a [`FilterParams`] bag.
//!
//! All active tests compose by AND. A date range excludes items that have no
//! primary date.

use chrono::{DateTime, Utc};
use dealer_core::{Entity, EntitySet, RecordFilter, Stored};
use serde_json::Value;

use crate::params::FilterParams;
use crate::range::{DateRange, Interval};

/// `assignedTo` value that selects records nobody owns.
pub const UNASSIGNED: &str = "unassigned";

const ASSIGNED_TO_KEY: &str = "assignedTo";

/// A compiled filter ready to test items.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    interval: Option<Interval>,
    search: Option<String>,
    fields: Vec<(String, Value)>,
}

impl Predicate {
    /// Compile a parameter bag against `now`.
    pub fn new(params: &FilterParams, now: DateTime<Utc>) -> Self {
        let interval = params.date_range.as_deref().and_then(|name| {
            DateRange::parse(name, params.start_date, params.end_date).resolve(now)
        });

        Self {
            interval,
            search: params.active_search().map(str::to_lowercase),
            fields: params
                .active_fields()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        }
    }

    /// A predicate that accepts everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep only the date range. Cross-entity reports apply this to
    /// collections whose fields the caller's filters do not describe.
    pub fn range_only(&self) -> Self {
        Self {
            interval: self.interval,
            search: None,
            fields: Vec::new(),
        }
    }

    pub fn interval(&self) -> Option<Interval> {
        self.interval
    }

    pub fn is_unconstrained(&self) -> bool {
        self.interval.is_none() && self.search.is_none() && self.fields.is_empty()
    }

    pub fn matches<T: Entity>(&self, item: &T) -> bool {
        self.matches_range(item) && self.matches_search(item) && self.matches_fields(item)
    }

    /// Borrow the matching items, preserving order.
    pub fn select<'a, T: Entity>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    /// Filter a kind-erased set in place.
    pub fn apply(&self, set: &mut EntitySet) {
        if !self.is_unconstrained() {
            set.retain(self);
        }
    }

    fn matches_range<T: Entity>(&self, item: &T) -> bool {
        match self.interval {
            None => true,
            Some(interval) => item
                .primary_date()
                .is_some_and(|date| interval.contains(date)),
        }
    }

    fn matches_search<T: Entity>(&self, item: &T) -> bool {
        match &self.search {
            None => true,
            Some(needle) => item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }

    fn matches_fields<T: Entity>(&self, item: &T) -> bool {
        self.fields.iter().all(|(key, expected)| {
            if key == ASSIGNED_TO_KEY && expected.as_str() == Some(UNASSIGNED) {
                return item.assigned_to().map_or(true, str::is_empty);
            }
            item.field(key).matches(expected)
        })
    }
}

impl RecordFilter for Predicate {
    fn keep<T: Stored>(&self, item: &T) -> bool {
        self.matches(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_core::{Expense, Lead, LeadStatus, Payment};
    use serde_json::json;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn lead(id: &str, status: LeadStatus, created: &str) -> Lead {
        Lead {
            id: id.to_string(),
            name: format!("Lead {}", id),
            company: "Northwind Motors".to_string(),
            status,
            source: "Website".to_string(),
            created_at: at(created),
            ..Default::default()
        }
    }

    #[test]
    fn test_unconstrained_accepts_everything() {
        let predicate = Predicate::new(&FilterParams::new(), Utc::now());
        assert!(predicate.is_unconstrained());
        assert!(predicate.matches(&Payment::default()));
    }

    #[test]
    fn test_each_violated_predicate_excludes() {
        let now = at("2024-01-31T12:00:00Z");
        let params = FilterParams::new()
            .with_date_range("this_month")
            .with_search("northwind")
            .with_field("status", "New");
        let predicate = Predicate::new(&params, now);

        let passing = lead("ok", LeadStatus::New, "2024-01-05T00:00:00Z");
        assert!(predicate.matches(&passing));

        let wrong_date = lead("date", LeadStatus::New, "2023-12-31T23:59:59Z");
        let wrong_status = lead("status", LeadStatus::Qualified, "2024-01-05T00:00:00Z");
        let mut wrong_text = lead("text", LeadStatus::New, "2024-01-05T00:00:00Z");
        wrong_text.company = "Contoso".to_string();

        assert!(!predicate.matches(&wrong_date));
        assert!(!predicate.matches(&wrong_status));
        assert!(!predicate.matches(&wrong_text));
    }

    #[test]
    fn test_search_ignores_enum_fields() {
        let predicate = Predicate::new(&FilterParams::new().with_search("qualified"), Utc::now());
        let item = lead("a", LeadStatus::Qualified, "2024-01-05T00:00:00Z");
        assert!(!predicate.matches(&item));

        let predicate = Predicate::new(&FilterParams::new().with_search("NORTH"), Utc::now());
        assert!(predicate.matches(&item));
    }

    #[test]
    fn test_missing_date_fails_closed() {
        let now = at("2024-01-31T12:00:00Z");
        let undated = Payment {
            id: "pay-x".to_string(),
            amount: 10.0,
            ..Default::default()
        };
        let ranged = Predicate::new(&FilterParams::new().with_date_range("all_time"), now);
        assert!(ranged.matches(&undated));

        let ranged = Predicate::new(&FilterParams::new().with_date_range("this_year"), now);
        assert!(!ranged.matches(&undated));
    }

    #[test]
    fn test_unassigned_special_case() {
        let predicate = Predicate::new(
            &FilterParams::new().with_field("assignedTo", "unassigned"),
            Utc::now(),
        );
        let mut item = lead("a", LeadStatus::New, "2024-01-05T00:00:00Z");
        assert!(predicate.matches(&item));

        item.assigned_to = Some(String::new());
        assert!(predicate.matches(&item));

        item.assigned_to = Some("user-001".to_string());
        assert!(!predicate.matches(&item));
    }

    #[test]
    fn test_boolean_filters_are_strict() {
        let approved = Expense {
            approved: true,
            ..Default::default()
        };
        let strict = Predicate::new(&FilterParams::new().with_field("approved", true), Utc::now());
        let loose = Predicate::new(&FilterParams::new().with_field("approved", "true"), Utc::now());
        assert!(strict.matches(&approved));
        assert!(!loose.matches(&approved));
    }

    #[test]
    fn test_unknown_field_excludes() {
        let predicate = Predicate::new(&FilterParams::new().with_field("colour", "red"), Utc::now());
        assert!(!predicate.matches(&lead("a", LeadStatus::New, "2024-01-05T00:00:00Z")));
    }

    #[test]
    fn test_apply_to_set() {
        let mut set = EntitySet::Lead(vec![
            lead("a", LeadStatus::New, "2024-01-05T00:00:00Z"),
            lead("b", LeadStatus::Qualified, "2024-01-06T00:00:00Z"),
        ]);
        Predicate::new(&FilterParams::from_value(&json!({"status": "Qualified"})).unwrap(), Utc::now())
            .apply(&mut set);
        assert_eq!(set.ids(), vec!["b".to_string()]);
    }
}
