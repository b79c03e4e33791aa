//! Symbolic date ranges and their resolution to concrete intervals.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use tracing::warn;

/// A closed interval. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// A named range a UI can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    Yesterday,
    ThisWeek,
    Last7Days,
    ThisMonth,
    LastMonth,
    Last30Days,
    Last90Days,
    ThisQuarter,
    ThisYear,
    LastYear,
    AllTime,
    Custom {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl DateRange {
    /// Parse a range name. Unknown names mean all time.
    pub fn parse(
        name: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "today" => Self::Today,
            "yesterday" => Self::Yesterday,
            "this_week" => Self::ThisWeek,
            "last_7_days" => Self::Last7Days,
            "this_month" => Self::ThisMonth,
            "last_month" => Self::LastMonth,
            "last_30_days" => Self::Last30Days,
            "last_90_days" => Self::Last90Days,
            "this_quarter" => Self::ThisQuarter,
            "this_year" => Self::ThisYear,
            "last_year" => Self::LastYear,
            "all_time" | "all" | "" => Self::AllTime,
            "custom" => Self::Custom { start, end },
            other => {
                warn!("Unknown date range {:?}, treating as all time", other);
                Self::AllTime
            }
        }
    }

    /// Resolve against `now`. `None` means the range does not constrain dates.
    ///
    /// Ranges covering the current period end at `now`. Closed past periods
    /// end one millisecond before the following period begins.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<Interval> {
        let today = now.date_naive();
        let interval = match self {
            Self::Today => Interval::new(midnight(today), now),
            Self::Yesterday => {
                let start = midnight(today) - Duration::days(1);
                Interval::new(start, just_before(midnight(today)))
            }
            Self::ThisWeek => {
                let offset = i64::from(today.weekday().num_days_from_monday());
                Interval::new(midnight(today) - Duration::days(offset), now)
            }
            Self::Last7Days => Interval::new(now - Duration::days(7), now),
            Self::ThisMonth => Interval::new(midnight(first_of_month(today.year(), today.month())), now),
            Self::LastMonth => {
                let (year, month) = previous_month(today.year(), today.month());
                let start = midnight(first_of_month(year, month));
                let next = midnight(first_of_month(today.year(), today.month()));
                Interval::new(start, just_before(next))
            }
            Self::Last30Days => Interval::new(now - Duration::days(30), now),
            Self::Last90Days => Interval::new(now - Duration::days(90), now),
            Self::ThisQuarter => {
                let quarter_month = (today.month0() / 3) * 3 + 1;
                Interval::new(midnight(first_of_month(today.year(), quarter_month)), now)
            }
            Self::ThisYear => Interval::new(midnight(first_of_month(today.year(), 1)), now),
            Self::LastYear => {
                let start = midnight(first_of_month(today.year() - 1, 1));
                let next = midnight(first_of_month(today.year(), 1));
                Interval::new(start, just_before(next))
            }
            Self::AllTime => return None,
            Self::Custom { start: None, end: None } => return None,
            Self::Custom { start, end } => Interval::new(
                start.unwrap_or(DateTime::<Utc>::MIN_UTC),
                end.unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
        };
        Some(interval)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn just_before(at: DateTime<Utc>) -> DateTime<Utc> {
    at - Duration::milliseconds(1)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day one exists for every month chrono can represent.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn resolve(name: &str, now: &str) -> Interval {
        DateRange::parse(name, None, None).resolve(at(now)).unwrap()
    }

    #[test]
    fn test_this_month_runs_to_now() {
        let interval = resolve("this_month", "2024-01-31T15:00:00Z");
        assert_eq!(interval.start, at("2024-01-01T00:00:00Z"));
        assert_eq!(interval.end, at("2024-01-31T15:00:00Z"));
    }

    #[test]
    fn test_last_month_crosses_year() {
        let interval = resolve("last_month", "2024-01-15T09:30:00Z");
        assert_eq!(interval.start, at("2023-12-01T00:00:00Z"));
        assert_eq!(interval.end, at("2023-12-31T23:59:59.999Z"));
    }

    #[test]
    fn test_this_week_starts_monday() {
        // 2024-01-31 is a Wednesday.
        let interval = resolve("this_week", "2024-01-31T12:00:00Z");
        assert_eq!(interval.start, at("2024-01-29T00:00:00Z"));
    }

    #[test]
    fn test_quarter_and_years() {
        assert_eq!(
            resolve("this_quarter", "2024-05-20T00:00:00Z").start,
            at("2024-04-01T00:00:00Z")
        );
        let last_year = resolve("last_year", "2024-05-20T00:00:00Z");
        assert_eq!(last_year.start, at("2023-01-01T00:00:00Z"));
        assert_eq!(last_year.end, at("2023-12-31T23:59:59.999Z"));
    }

    #[test]
    fn test_yesterday() {
        let interval = resolve("yesterday", "2024-03-01T08:00:00Z");
        assert_eq!(interval.start, at("2024-02-29T00:00:00Z"));
        assert_eq!(interval.end, at("2024-02-29T23:59:59.999Z"));
    }

    #[test]
    fn test_unknown_and_all_time_do_not_constrain() {
        let now = at("2024-01-31T00:00:00Z");
        assert_eq!(DateRange::parse("fortnight", None, None), DateRange::AllTime);
        assert!(DateRange::parse("all_time", None, None).resolve(now).is_none());
        assert!(DateRange::parse("custom", None, None).resolve(now).is_none());
    }

    #[test]
    fn test_open_ended_custom_range() {
        let start = at("2024-01-10T00:00:00Z");
        let interval = DateRange::parse("custom", Some(start), None)
            .resolve(at("2024-01-31T00:00:00Z"))
            .unwrap();
        assert!(interval.contains(start));
        assert!(!interval.contains(start - Duration::milliseconds(1)));
        assert!(interval.contains(at("2030-01-01T00:00:00Z")));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let interval = resolve("last_7_days", "2024-01-31T00:00:00Z");
        assert!(interval.contains(interval.start));
        assert!(interval.contains(interval.end));
        assert!(!interval.contains(interval.start - Duration::milliseconds(1)));
        assert!(!interval.contains(interval.end + Duration::milliseconds(1)));
    }
}
