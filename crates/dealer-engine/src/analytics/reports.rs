//! The individual reports.
//!
//! Each report filters the collections it reads with the caller's predicate.
//! Cross-entity reports filter secondary collections by date range only,
//! since field filters name fields of the primary collection.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use dealer_core::{Collections, Entity, Invoice, LeadStatus, StockStatus, UserType};

use super::group::{
    average, count_by, count_where, percent, ratio, sum_by, total, Grouping, SeriesPoint,
};
use super::{Report, ReportKind};
use crate::predicate::Predicate;

/// Users active within this many days count as active.
const ACTIVE_USER_DAYS: i64 = 30;

/// Label for records with no assignee.
const UNASSIGNED_BUCKET: &str = "Unassigned";

pub(super) struct ReportContext<'a> {
    pub collections: &'a Collections,
    pub predicate: &'a Predicate,
    pub now: DateTime<Utc>,
}

impl<'a> ReportContext<'a> {
    fn select<T: Entity>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.predicate.select(items)
    }

    fn select_in_range<T: Entity>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.predicate.range_only().select(items)
    }
}

fn is_open_ticket(status: &str) -> bool {
    matches!(status, "Open" | "In Progress")
}

fn is_resolved_ticket(status: &str) -> bool {
    matches!(status, "Resolved" | "Closed")
}

fn is_overdue_invoice(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    invoice.status == "Overdue" || (invoice.amount_due > 0.0 && invoice.due_date < now)
}

fn is_low_stock(status: StockStatus) -> bool {
    matches!(status, StockStatus::LowStock | StockStatus::OutOfStock)
}

/// Group by calendar month, in chronological order.
fn monthly<T, D, V>(items: &[&T], date: D, value: V) -> Vec<SeriesPoint>
where
    D: Fn(&T) -> Option<DateTime<Utc>>,
    V: Fn(&T) -> f64,
{
    let mut grouping = Grouping::new();
    for item in items {
        if let Some(date) = date(*item) {
            let month = date.format("%Y-%m").to_string();
            grouping.add(Some(month.as_str()), value(*item));
        }
    }
    let mut series = grouping.into_series();
    series.sort_by(|a, b| a.name.cmp(&b.name));
    series
}

pub(super) fn leads(ctx: &ReportContext<'_>) -> Report {
    let leads = ctx.select(&ctx.collections.leads);
    let with_status = |status: LeadStatus| count_where(&leads, |l| l.status == status);

    let qualified = with_status(LeadStatus::Qualified);
    let pipeline = total(&leads, |l| {
        if l.status == LeadStatus::Disqualified {
            0.0
        } else {
            l.estimated_value
        }
    });

    let mut report = Report::new(ReportKind::Leads);
    report.push_count("totalLeads", leads.len());
    report.push_count("newLeads", with_status(LeadStatus::New));
    report.push_count("qualifiedLeads", qualified);
    report.push_count("disqualifiedLeads", with_status(LeadStatus::Disqualified));
    report.push_kpi("conversionRate", percent(qualified as f64, leads.len() as f64));
    report.push_kpi("pipelineValue", pipeline);
    report.push_kpi(
        "averageDealValue",
        average(total(&leads, |l| l.estimated_value), leads.len()),
    );
    report.push_count("unassignedLeads", count_where(&leads, |l| l.assigned_to().is_none()));

    report.push_series("statusBreakdown", count_by(&leads, |l| Some(l.status.as_str())));
    report.push_series("sourceBreakdown", count_by(&leads, |l| Some(l.source.as_str())));
    report.push_series(
        "valueBySource",
        sum_by(&leads, |l| Some(l.source.as_str()), |l| l.estimated_value),
    );
    report.push_series("leadsByMonth", monthly(&leads, |l| l.primary_date(), |_| 1.0));
    report
}

pub(super) fn customers(ctx: &ReportContext<'_>) -> Report {
    let customers = ctx.select(&ctx.collections.customers);
    let revenue = total(&customers, |c| c.total_spent);

    let mut report = Report::new(ReportKind::Customers);
    report.push_count("totalCustomers", customers.len());
    report.push_count("activeCustomers", count_where(&customers, |c| c.status == "Active"));
    report.push_kpi("totalRevenue", revenue);
    report.push_kpi("averageSpend", average(revenue, customers.len()));
    report.push_kpi(
        "totalPurchases",
        total(&customers, |c| f64::from(c.total_purchases)),
    );

    report.push_series(
        "byClassification",
        count_by(&customers, |c| Some(c.classification.as_str())),
    );
    report.push_series(
        "revenueByClassification",
        sum_by(&customers, |c| Some(c.classification.as_str()), |c| c.total_spent),
    );
    report.push_series("byStatus", count_by(&customers, |c| Some(c.status.as_str())));
    report
}

pub(super) fn inventory(ctx: &ReportContext<'_>) -> Report {
    let products = ctx.select(&ctx.collections.products);
    let low = count_where(&products, |p| p.status == StockStatus::LowStock);
    let out = count_where(&products, |p| p.status == StockStatus::OutOfStock);

    let mut report = Report::new(ReportKind::Inventory);
    report.push_count("totalProducts", products.len());
    report.push_kpi("totalUnits", total(&products, |p| f64::from(p.current_stock)));
    report.push_kpi("inventoryValue", total(&products, |p| p.stock_value()));
    report.push_count("lowStock", low);
    report.push_count("outOfStock", out);
    report.push_kpi("reorderRate", percent((low + out) as f64, products.len() as f64));

    report.push_series("byCategory", count_by(&products, |p| Some(p.category.as_str())));
    report.push_series(
        "stockByCategory",
        sum_by(&products, |p| Some(p.category.as_str()), |p| f64::from(p.current_stock)),
    );
    report.push_series(
        "valueByCategory",
        sum_by(&products, |p| Some(p.category.as_str()), |p| p.stock_value()),
    );
    report.push_series("byStatus", count_by(&products, |p| Some(p.status.as_str())));
    report
}

pub(super) fn sales(ctx: &ReportContext<'_>) -> Report {
    let orders = ctx.select(&ctx.collections.sales_orders);
    let booked: Vec<_> = orders
        .iter()
        .copied()
        .filter(|o| o.status != "Cancelled")
        .collect();
    let revenue = total(&booked, |o| o.total_value);

    let mut report = Report::new(ReportKind::Sales);
    report.push_count("totalOrders", orders.len());
    report.push_kpi("totalRevenue", revenue);
    report.push_count("completedOrders", count_where(&orders, |o| o.status == "Completed"));
    report.push_kpi("averageOrderValue", average(revenue, booked.len()));
    report.push_count("unpaidOrders", count_where(&orders, |o| o.payment_status != "Paid"));
    report.push_kpi(
        "itemsSold",
        total(&booked, |o| o.items.iter().map(|i| f64::from(i.quantity)).sum()),
    );

    report.push_series("byStatus", count_by(&orders, |o| Some(o.status.as_str())));
    report.push_series(
        "byPaymentStatus",
        count_by(&orders, |o| Some(o.payment_status.as_str())),
    );
    report.push_series(
        "revenueByMonth",
        monthly(&booked, |o| o.primary_date(), |o| o.total_value),
    );

    let mut units = Grouping::new();
    for order in &booked {
        for item in &order.items {
            units.add(Some(item.product_id.as_str()), f64::from(item.quantity));
        }
    }
    report.push_series("unitsByProduct", units.into_series());
    report
}

pub(super) fn campaigns(ctx: &ReportContext<'_>) -> Report {
    let campaigns = ctx.select(&ctx.collections.campaigns);
    let budget = total(&campaigns, |c| c.budget);
    let spend = total(&campaigns, |c| c.actual_spend);
    let generated = total(&campaigns, |c| f64::from(c.leads_generated));

    let campaign_ids: Vec<&str> = campaigns.iter().map(|c| c.id.as_str()).collect();
    let leads = ctx.select_in_range(&ctx.collections.leads);
    let attributed = count_where(&leads, |l| {
        l.campaign_id
            .as_deref()
            .is_some_and(|id| campaign_ids.contains(&id))
    });

    let mut report = Report::new(ReportKind::Campaigns);
    report.push_count("totalCampaigns", campaigns.len());
    report.push_count("activeCampaigns", count_where(&campaigns, |c| c.status == "Active"));
    report.push_kpi("totalBudget", budget);
    report.push_kpi("totalSpend", spend);
    report.push_kpi("budgetUtilization", percent(spend, budget));
    report.push_kpi("leadsGenerated", generated);
    report.push_kpi("costPerLead", ratio(spend, generated));
    report.push_kpi("averageRoi", average(total(&campaigns, |c| c.roi), campaigns.len()));
    report.push_count("attributedLeads", attributed);

    report.push_series("byType", count_by(&campaigns, |c| Some(c.campaign_type.as_str())));
    report.push_series(
        "spendByType",
        sum_by(&campaigns, |c| Some(c.campaign_type.as_str()), |c| c.actual_spend),
    );
    report.push_series(
        "leadsByType",
        sum_by(
            &campaigns,
            |c| Some(c.campaign_type.as_str()),
            |c| f64::from(c.leads_generated),
        ),
    );
    report.push_series("byStatus", count_by(&campaigns, |c| Some(c.status.as_str())));
    report
}

pub(super) fn service(ctx: &ReportContext<'_>) -> Report {
    let tickets = ctx.select(&ctx.collections.service_tickets);
    let resolved = count_where(&tickets, |t| is_resolved_ticket(&t.status));
    let timed: Vec<f64> = tickets
        .iter()
        .filter_map(|t| t.resolution_time_hours)
        .collect();

    let mut report = Report::new(ReportKind::Service);
    report.push_count("totalTickets", tickets.len());
    report.push_count("openTickets", count_where(&tickets, |t| is_open_ticket(&t.status)));
    report.push_count("resolvedTickets", resolved);
    report.push_kpi("resolutionRate", percent(resolved as f64, tickets.len() as f64));
    report.push_kpi(
        "averageResolutionHours",
        average(timed.iter().sum(), timed.len()),
    );
    report.push_count(
        "urgentOpen",
        count_where(&tickets, |t| t.priority == "Urgent" && is_open_ticket(&t.status)),
    );

    report.push_series("byStatus", count_by(&tickets, |t| Some(t.status.as_str())));
    report.push_series("byPriority", count_by(&tickets, |t| Some(t.priority.as_str())));
    report.push_series("byIssue", count_by(&tickets, |t| Some(t.issue.as_str())));
    report
}

pub(super) fn invoices(ctx: &ReportContext<'_>) -> Report {
    let invoices = ctx.select(&ctx.collections.invoices);
    let billed = total(&invoices, |i| i.total_amount);
    let collected = total(&invoices, |i| i.amount_paid());

    let mut report = Report::new(ReportKind::Invoices);
    report.push_count("totalInvoices", invoices.len());
    report.push_kpi("totalBilled", billed);
    report.push_kpi("outstanding", total(&invoices, |i| i.amount_due));
    report.push_kpi("collected", collected);
    report.push_kpi("collectionRate", percent(collected, billed));
    report.push_count("paidInvoices", count_where(&invoices, |i| i.status == "Paid"));
    report.push_count(
        "overdueInvoices",
        count_where(&invoices, |i| is_overdue_invoice(i, ctx.now)),
    );

    report.push_series("byStatus", count_by(&invoices, |i| Some(i.status.as_str())));
    report.push_series(
        "amountByStatus",
        sum_by(&invoices, |i| Some(i.status.as_str()), |i| i.total_amount),
    );
    report.push_series(
        "outstandingByStatus",
        sum_by(&invoices, |i| Some(i.status.as_str()), |i| i.amount_due),
    );
    report
}

pub(super) fn expenses(ctx: &ReportContext<'_>) -> Report {
    let expenses = ctx.select(&ctx.collections.expenses);
    let amount = total(&expenses, |e| e.amount);

    let mut report = Report::new(ReportKind::Expenses);
    report.push_count("totalExpenses", expenses.len());
    report.push_kpi("totalAmount", amount);
    report.push_kpi(
        "approvedAmount",
        total(&expenses, |e| if e.approved { e.amount } else { 0.0 }),
    );
    report.push_count("pendingExpenses", count_where(&expenses, |e| e.status == "Pending"));
    report.push_kpi("averageExpense", average(amount, expenses.len()));

    report.push_series(
        "byCategory",
        sum_by(&expenses, |e| Some(e.category.as_str()), |e| e.amount),
    );
    report.push_series("byStatus", count_by(&expenses, |e| Some(e.status.as_str())));
    report.push_series(
        "expensesByMonth",
        monthly(&expenses, |e| e.primary_date(), |e| e.amount),
    );
    report
}

pub(super) fn payments(ctx: &ReportContext<'_>) -> Report {
    let payments = ctx.select(&ctx.collections.payments);
    let sum_with_status = |status: &str| {
        total(&payments, |p| if p.status == status { p.amount } else { 0.0 })
    };

    let mut report = Report::new(ReportKind::Payments);
    report.push_count("totalPayments", payments.len());
    report.push_kpi("totalReceived", sum_with_status("Completed"));
    report.push_kpi("pendingAmount", sum_with_status("Pending"));
    report.push_kpi(
        "averagePayment",
        average(total(&payments, |p| p.amount), payments.len()),
    );
    report.push_count("failedPayments", count_where(&payments, |p| p.status == "Failed"));

    report.push_series(
        "byMethod",
        sum_by(&payments, |p| Some(p.method.as_str()), |p| p.amount),
    );
    report.push_series("byStatus", count_by(&payments, |p| Some(p.status.as_str())));
    report
}

/// Collected revenue and counted expenses over the range.
struct Ledger {
    revenue: f64,
    expenses: f64,
}

impl Ledger {
    fn new(ctx: &ReportContext<'_>, invoices: &[&Invoice]) -> Self {
        let expenses = ctx.select_in_range(&ctx.collections.expenses);
        Self {
            revenue: total(invoices, |i| i.amount_paid()),
            expenses: total(&expenses, |e| if e.status == "Rejected" { 0.0 } else { e.amount }),
        }
    }

    fn net_profit(&self) -> f64 {
        self.revenue - self.expenses
    }
}

pub(super) fn finance(ctx: &ReportContext<'_>) -> Report {
    let invoices = ctx.select(&ctx.collections.invoices);
    let expenses = ctx.select_in_range(&ctx.collections.expenses);
    let payments = ctx.select_in_range(&ctx.collections.payments);
    let ledger = Ledger::new(ctx, &invoices);

    let mut report = Report::new(ReportKind::Finance);
    report.push_kpi("revenue", ledger.revenue);
    report.push_kpi("expenses", ledger.expenses);
    report.push_kpi("netProfit", ledger.net_profit());
    report.push_kpi("profitMargin", percent(ledger.net_profit(), ledger.revenue));
    report.push_kpi("outstandingReceivables", total(&invoices, |i| i.amount_due));
    report.push_kpi(
        "paymentsReceived",
        total(&payments, |p| if p.status == "Completed" { p.amount } else { 0.0 }),
    );

    report.push_series(
        "revenueVsExpenses",
        vec![
            SeriesPoint::new("Revenue", ledger.revenue),
            SeriesPoint::new("Expenses", ledger.expenses),
        ],
    );
    report.push_series(
        "expensesByCategory",
        sum_by(
            &expenses,
            |e| Some(e.category.as_str()),
            |e| if e.status == "Rejected" { 0.0 } else { e.amount },
        ),
    );
    report.push_series(
        "revenueByMonth",
        monthly(&invoices, |i| i.primary_date(), |i| i.amount_paid()),
    );
    report
}

pub(super) fn users(ctx: &ReportContext<'_>) -> Report {
    let users = ctx.select(&ctx.collections.users);
    let cutoff = ctx.now - Duration::days(ACTIVE_USER_DAYS);
    let active = count_where(&users, |u| u.last_activity >= cutoff);

    // Open work per assignee, keyed by user id and labelled by name.
    let names: HashMap<&str, &str> = users
        .iter()
        .map(|u| (u.id.as_str(), u.name.as_str()))
        .collect();
    let mut workload = Grouping::new();
    let mut add_open = |assignee: Option<&str>| {
        if let Some(id) = assignee {
            if let Some(name) = names.get(id) {
                workload.add(Some(*name), 1.0);
            }
        }
    };
    for lead in ctx.select_in_range(&ctx.collections.leads) {
        if !matches!(lead.status, LeadStatus::Qualified | LeadStatus::Disqualified) {
            add_open(lead.assigned_to());
        }
    }
    for ticket in ctx.select_in_range(&ctx.collections.service_tickets) {
        if is_open_ticket(&ticket.status) {
            add_open(ticket.assigned_to());
        }
    }
    for task in ctx.select_in_range(&ctx.collections.tasks) {
        if task.status != "Completed" {
            add_open(task.assigned_to());
        }
    }

    let mut report = Report::new(ReportKind::Users);
    report.push_count("totalUsers", users.len());
    report.push_count(
        "dealerStaff",
        count_where(&users, |u| u.user_type == UserType::DealerStaff),
    );
    report.push_count(
        "brandRepresentatives",
        count_where(&users, |u| u.user_type == UserType::BrandRepresentative),
    );
    report.push_count("activeUsers", active);
    report.push_kpi("activeRate", percent(active as f64, users.len() as f64));

    report.push_series("byRole", count_by(&users, |u| Some(u.role.as_str())));
    report.push_series("byType", count_by(&users, |u| Some(u.user_type.as_str())));
    report.push_series("openWorkload", workload.into_series());
    report
}

pub(super) fn tasks(ctx: &ReportContext<'_>) -> Report {
    let tasks = ctx.select(&ctx.collections.tasks);
    let completed = count_where(&tasks, |t| t.status == "Completed");

    let mut report = Report::new(ReportKind::Tasks);
    report.push_count("totalTasks", tasks.len());
    report.push_count("completedTasks", completed);
    report.push_count(
        "overdueTasks",
        count_where(&tasks, |t| t.status != "Completed" && t.due_date < ctx.now),
    );
    report.push_kpi("completionRate", percent(completed as f64, tasks.len() as f64));
    report.push_count("unassignedTasks", count_where(&tasks, |t| t.assigned_to().is_none()));

    report.push_series("byStatus", count_by(&tasks, |t| Some(t.status.as_str())));
    report.push_series("byModule", count_by(&tasks, |t| Some(t.module.as_str())));
    report.push_series(
        "byAssignee",
        count_by(&tasks, |t| Some(t.assigned_to().unwrap_or(UNASSIGNED_BUCKET))),
    );
    report
}

pub(super) fn dashboard(ctx: &ReportContext<'_>) -> Report {
    let c = ctx.collections;
    let leads = ctx.select_in_range(&c.leads);
    let orders = ctx.select_in_range(&c.sales_orders);
    let tickets = ctx.select_in_range(&c.service_tickets);
    let tasks = ctx.select_in_range(&c.tasks);
    let invoices = ctx.select_in_range(&c.invoices);
    let booked: Vec<_> = orders
        .iter()
        .copied()
        .filter(|o| o.status != "Cancelled")
        .collect();
    let qualified = count_where(&leads, |l| l.status == LeadStatus::Qualified);
    let ledger = Ledger::new(ctx, &invoices);

    let mut report = Report::new(ReportKind::Dashboard);
    report.push_count("totalLeads", leads.len());
    report.push_count("qualifiedLeads", qualified);
    report.push_kpi("leadConversionRate", percent(qualified as f64, leads.len() as f64));
    report.push_count("totalCustomers", ctx.select_in_range(&c.customers).len());
    report.push_kpi("salesRevenue", total(&booked, |o| o.total_value));
    report.push_count("openTickets", count_where(&tickets, |t| is_open_ticket(&t.status)));
    report.push_count(
        "overdueTasks",
        count_where(&tasks, |t| t.status != "Completed" && t.due_date < ctx.now),
    );
    report.push_count(
        "lowStockProducts",
        c.products.iter().filter(|p| is_low_stock(p.status)).count(),
    );
    report.push_kpi("netProfit", ledger.net_profit());

    // Funnel stages keep their pipeline order, empty stages included.
    let funnel = LeadStatus::ALL
        .iter()
        .map(|status| {
            let count = count_where(&leads, |l| l.status == *status);
            SeriesPoint::new(status.as_str(), count as f64)
        })
        .collect();
    report.push_series("leadFunnel", funnel);
    report.push_series(
        "revenueByMonth",
        monthly(&booked, |o| o.primary_date(), |o| o.total_value),
    );
    report
}
