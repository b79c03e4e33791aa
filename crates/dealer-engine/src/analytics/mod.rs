//! Report computation over committed collections.
//!
//! Reports are pure: they read a [`Collections`] value and never mutate it.
//! The caller's parameter bag is applied with the same [`Predicate`] that
//! fetches use before anything is counted or summed.

mod group;
mod reports;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dealer_core::Collections;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::FilterParams;
use crate::predicate::Predicate;

pub use group::{average, count_by, percent, ratio, sum_by, Grouping, SeriesPoint, UNKNOWN_BUCKET};

/// The report catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Dashboard,
    Leads,
    Customers,
    Inventory,
    Sales,
    Campaigns,
    Service,
    Invoices,
    Expenses,
    Payments,
    Finance,
    Users,
    Tasks,
}

impl ReportKind {
    pub const ALL: [ReportKind; 13] = [
        Self::Dashboard,
        Self::Leads,
        Self::Customers,
        Self::Inventory,
        Self::Sales,
        Self::Campaigns,
        Self::Service,
        Self::Invoices,
        Self::Expenses,
        Self::Payments,
        Self::Finance,
        Self::Users,
        Self::Tasks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Leads => "leads",
            Self::Customers => "customers",
            Self::Inventory => "inventory",
            Self::Sales => "sales",
            Self::Campaigns => "campaigns",
            Self::Service => "service",
            Self::Invoices => "invoices",
            Self::Expenses => "expenses",
            Self::Payments => "payments",
            Self::Finance => "finance",
            Self::Users => "users",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = EngineError;

    /// Accepts report tags and module aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" | "overview" => Self::Dashboard,
            "leads" | "crm" => Self::Leads,
            "customers" => Self::Customers,
            "inventory" | "products" => Self::Inventory,
            "sales" | "orders" | "salesorders" => Self::Sales,
            "campaigns" | "marketing" => Self::Campaigns,
            "service" | "tickets" | "servicetickets" => Self::Service,
            "invoices" => Self::Invoices,
            "expenses" => Self::Expenses,
            "payments" => Self::Payments,
            "finance" => Self::Finance,
            "users" | "team" => Self::Users,
            "tasks" => Self::Tasks,
            _ => return Err(EngineError::UnknownReport(s.to_string())),
        };
        Ok(kind)
    }
}

/// A computed report: scalar KPIs plus chart-ready series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report: ReportKind,
    pub kpis: IndexMap<String, f64>,
    pub series: IndexMap<String, Vec<SeriesPoint>>,
}

impl Report {
    pub fn new(report: ReportKind) -> Self {
        Self {
            report,
            kpis: IndexMap::new(),
            series: IndexMap::new(),
        }
    }

    pub fn kpi(&self, name: &str) -> Option<f64> {
        self.kpis.get(name).copied()
    }

    pub fn series(&self, name: &str) -> Option<&[SeriesPoint]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub(crate) fn push_kpi(&mut self, name: &str, value: f64) {
        self.kpis.insert(name.to_string(), value);
    }

    pub(crate) fn push_count(&mut self, name: &str, count: usize) {
        self.push_kpi(name, count as f64);
    }

    pub(crate) fn push_series(&mut self, name: &str, points: Vec<SeriesPoint>) {
        self.series.insert(name.to_string(), points);
    }
}

/// Compute `kind` over `collections` filtered by `params`.
pub fn compute(
    collections: &Collections,
    kind: ReportKind,
    params: &FilterParams,
    now: DateTime<Utc>,
) -> Report {
    let predicate = Predicate::new(params, now);
    let ctx = reports::ReportContext {
        collections,
        predicate: &predicate,
        now,
    };

    match kind {
        ReportKind::Dashboard => reports::dashboard(&ctx),
        ReportKind::Leads => reports::leads(&ctx),
        ReportKind::Customers => reports::customers(&ctx),
        ReportKind::Inventory => reports::inventory(&ctx),
        ReportKind::Sales => reports::sales(&ctx),
        ReportKind::Campaigns => reports::campaigns(&ctx),
        ReportKind::Service => reports::service(&ctx),
        ReportKind::Invoices => reports::invoices(&ctx),
        ReportKind::Expenses => reports::expenses(&ctx),
        ReportKind::Payments => reports::payments(&ctx),
        ReportKind::Finance => reports::finance(&ctx),
        ReportKind::Users => reports::users(&ctx),
        ReportKind::Tasks => reports::tasks(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_aliases() {
        assert_eq!("CRM".parse::<ReportKind>().unwrap(), ReportKind::Leads);
        assert_eq!("overview".parse::<ReportKind>().unwrap(), ReportKind::Dashboard);
        assert_eq!("Marketing".parse::<ReportKind>().unwrap(), ReportKind::Campaigns);
        assert!(matches!(
            "weather".parse::<ReportKind>(),
            Err(EngineError::UnknownReport(tag)) if tag == "weather"
        ));
        for kind in ReportKind::ALL {
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_every_report_handles_empty_collections() {
        let empty = Collections::default();
        for kind in ReportKind::ALL {
            let report = compute(&empty, kind, &FilterParams::new(), Utc::now());
            assert_eq!(report.report, kind);
            for (name, value) in &report.kpis {
                assert!(value.is_finite(), "{} {} is not finite", kind, name);
                assert_eq!(*value, 0.0, "{} {} should be zero", kind, name);
            }
        }
    }
}
