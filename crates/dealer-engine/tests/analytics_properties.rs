//! Properties of reports computed over seeded data.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dealer_core::{Collections, EntitySource};
use dealer_engine::{DealerStore, FilterParams, FixedClock, ReportKind, StoreConfig};
use mock_source::{InMemorySource, Seeder};

const TOLERANCE: f64 = 1e-6;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-30T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn seeded() -> Collections {
    Seeder::new(11, now()).generate()
}

async fn hydrated(collections: Collections) -> DealerStore {
    let source: Arc<dyn EntitySource> = Arc::new(InMemorySource::new(collections));
    let store = DealerStore::new(source, StoreConfig::default())
        .with_clock(Arc::new(FixedClock::new(now())));
    store.hydrate().await;
    store
}

fn series_sum(report: &dealer_engine::Report, name: &str) -> f64 {
    report
        .series(name)
        .unwrap_or_else(|| panic!("missing series {}", name))
        .iter()
        .map(|point| point.value)
        .sum()
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "{}: {} != {}",
        what,
        actual,
        expected
    );
}

#[tokio::test]
async fn test_grouped_series_sum_to_collection_totals() {
    let collections = seeded();
    let store = hydrated(collections.clone()).await;

    for range in ["all_time", "last_90_days", "this_year"] {
        let params = FilterParams::new().with_date_range(range);
        let predicate = dealer_engine::Predicate::new(&params, now());

        let leads = store.report(ReportKind::Leads, &params).await;
        let selected = predicate.select(&collections.leads);
        assert_close(
            series_sum(&leads, "valueBySource"),
            selected.iter().map(|l| l.estimated_value).sum(),
            "lead value by source",
        );
        assert_close(
            series_sum(&leads, "statusBreakdown"),
            leads.kpi("totalLeads").unwrap(),
            "lead status breakdown",
        );

        let expenses = store.report(ReportKind::Expenses, &params).await;
        let selected = predicate.select(&collections.expenses);
        assert_close(
            series_sum(&expenses, "byCategory"),
            selected.iter().map(|e| e.amount).sum(),
            "expenses by category",
        );

        let invoices = store.report(ReportKind::Invoices, &params).await;
        assert_close(
            series_sum(&invoices, "amountByStatus"),
            invoices.kpi("totalBilled").unwrap(),
            "invoice amount by status",
        );
        assert_close(
            series_sum(&invoices, "outstandingByStatus"),
            invoices.kpi("outstanding").unwrap(),
            "invoice outstanding by status",
        );

        let inventory = store.report(ReportKind::Inventory, &params).await;
        assert_close(
            series_sum(&inventory, "valueByCategory"),
            inventory.kpi("inventoryValue").unwrap(),
            "inventory value by category",
        );
    }
}

#[tokio::test]
async fn test_finance_reads_across_collections() {
    let collections = seeded();
    let store = hydrated(collections.clone()).await;
    let before = store.collections().await;

    let finance = store
        .analytics("finance", &FilterParams::new())
        .await
        .unwrap();

    let revenue: f64 = collections.invoices.iter().map(|i| i.amount_paid()).sum();
    let expenses: f64 = collections
        .expenses
        .iter()
        .filter(|e| e.status != "Rejected")
        .map(|e| e.amount)
        .sum();
    assert_close(finance.kpi("revenue").unwrap(), revenue, "revenue");
    assert_close(finance.kpi("expenses").unwrap(), expenses, "expenses");
    assert_close(finance.kpi("netProfit").unwrap(), revenue - expenses, "net profit");

    // Reports never mutate committed state.
    assert_eq!(store.collections().await, before);
}

#[tokio::test]
async fn test_ratios_are_zero_when_nothing_matches() {
    let store = hydrated(seeded()).await;
    let params = FilterParams::new().with_search("no record mentions this");

    for kind in ReportKind::ALL {
        let report = store.report(kind, &params).await;
        for (name, value) in &report.kpis {
            assert!(value.is_finite(), "{} {} is not finite", kind, name);
        }
    }

    let leads = store.report(ReportKind::Leads, &params).await;
    assert_eq!(leads.kpi("conversionRate"), Some(0.0));
    assert_eq!(leads.kpi("averageDealValue"), Some(0.0));

    let finance = store.report(ReportKind::Finance, &params).await;
    assert_eq!(finance.kpi("profitMargin"), Some(0.0));
}

#[tokio::test]
async fn test_dashboard_aliases_and_funnel() {
    let store = hydrated(seeded()).await;

    let overview = store.analytics("Overview", &FilterParams::new()).await.unwrap();
    assert_eq!(overview.report, ReportKind::Dashboard);

    let funnel = overview.series("leadFunnel").unwrap();
    assert_eq!(funnel.len(), 6);
    assert_eq!(funnel[0].name, "New");
    assert_close(
        funnel.iter().map(|p| p.value).sum(),
        overview.kpi("totalLeads").unwrap(),
        "lead funnel",
    );
}
