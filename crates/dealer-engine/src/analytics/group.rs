//! Categorical grouping that preserves first-seen key order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Bucket for records whose grouping field is empty or unset.
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// One chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Accumulates values per key in a single pass.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    buckets: IndexMap<String, f64>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the bucket for `key`. Blank or missing keys land in
    /// [`UNKNOWN_BUCKET`].
    pub fn add(&mut self, key: Option<&str>, amount: f64) {
        let key = key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(UNKNOWN_BUCKET);
        match self.buckets.get_mut(key) {
            Some(total) => *total += amount,
            None => {
                self.buckets.insert(key.to_string(), amount);
            }
        }
    }

    pub fn into_series(self) -> Vec<SeriesPoint> {
        self.buckets
            .into_iter()
            .map(|(name, value)| SeriesPoint { name, value })
            .collect()
    }
}

/// Count items per key.
pub fn count_by<T, F>(items: &[&T], key: F) -> Vec<SeriesPoint>
where
    F: Fn(&T) -> Option<&str>,
{
    sum_by(items, key, |_| 1.0)
}

/// Sum a numeric field per key.
pub fn sum_by<T, F, V>(items: &[&T], key: F, value: V) -> Vec<SeriesPoint>
where
    F: Fn(&T) -> Option<&str>,
    V: Fn(&T) -> f64,
{
    let mut grouping = Grouping::new();
    for item in items {
        grouping.add(key(*item), value(*item));
    }
    grouping.into_series()
}

/// Sum a numeric field over every item.
pub fn total<T, V>(items: &[&T], value: V) -> f64
where
    V: Fn(&T) -> f64,
{
    items.iter().map(|item| value(*item)).sum()
}

/// Count items satisfying a condition.
pub fn count_where<T, P>(items: &[&T], predicate: P) -> usize
where
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(**item)).count()
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Ratio expressed as a percentage.
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

pub fn average(sum: f64, count: usize) -> f64 {
    ratio(sum, count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        category: Option<&'static str>,
        amount: f64,
    }

    fn row(category: Option<&'static str>, amount: f64) -> Row {
        Row { category, amount }
    }

    #[test]
    fn test_first_seen_order_and_unknown_bucket() {
        let rows = [
            row(Some("Parts"), 10.0),
            row(None, 2.5),
            row(Some("Labor"), 4.0),
            row(Some("Parts"), 1.0),
            row(Some("  "), 0.5),
        ];
        let refs: Vec<&Row> = rows.iter().collect();

        let series = sum_by(&refs, |r| r.category, |r| r.amount);
        assert_eq!(
            series,
            vec![
                SeriesPoint::new("Parts", 11.0),
                SeriesPoint::new(UNKNOWN_BUCKET, 3.0),
                SeriesPoint::new("Labor", 4.0),
            ]
        );

        let counts = count_by(&refs, |r| r.category);
        assert_eq!(counts[0], SeriesPoint::new("Parts", 2.0));
        assert_eq!(counts[1], SeriesPoint::new(UNKNOWN_BUCKET, 2.0));
    }

    #[test]
    fn test_series_sum_matches_total() {
        let rows = [
            row(Some("A"), 1.25),
            row(Some("B"), 2.5),
            row(None, 4.0),
            row(Some("A"), 8.0),
        ];
        let refs: Vec<&Row> = rows.iter().collect();

        let series = sum_by(&refs, |r| r.category, |r| r.amount);
        let grouped: f64 = series.iter().map(|p| p.value).sum();
        assert_eq!(grouped, total(&refs, |r| r.amount));
    }

    #[test]
    fn test_zero_division() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(percent(0.0, 0.0), 0.0);
        assert_eq!(average(0.0, 0), 0.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
    }
}
