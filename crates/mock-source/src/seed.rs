//! Reproducible synthetic dealership data.

use chrono::{DateTime, Duration, Utc};
use dealer_core::{
    Collections, Customer, Expense, Invoice, Lead, LeadStatus, MarketingCampaign, OrderItem,
    Payment, Product, SalesOrder, ServiceTicket, StockStatus, Task, User, UserType,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FIRST_NAMES: &[&str] = &[
    "Amira", "Ben", "Carla", "Diego", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Kara",
    "Luca", "Maya", "Noah", "Olga", "Priya", "Quinn", "Rosa", "Sami", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Brennan", "Castillo", "Dubois", "Eriksen", "Fischer", "Gupta", "Haddad", "Ito",
    "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov",
];

const COMPANIES: &[&str] = &[
    "Northwind Logistics", "Bluegate Rentals", "Summit Builders", "Harbor Foods",
    "Redline Couriers", "Evergreen Landscaping", "Atlas Security", "Metro Plumbing",
];

const ROLES: &[&str] = &[
    "Sales Manager", "Sales Rep", "Service Advisor", "Finance Manager", "Marketing Lead",
    "Parts Manager",
];

const LEAD_SOURCES: &[&str] = &["Website", "Referral", "Walk-in", "Phone", "Social Media", "Event"];

const DISQUALIFICATION_REASONS: &[&str] = &[
    "Budget too low", "Bought elsewhere", "No response", "Not a decision maker",
];

const CLASSIFICATIONS: &[&str] = &["Retail", "Fleet", "VIP", "Commercial"];

const CUSTOMER_STATUSES: &[&str] = &["Active", "Active", "Active", "Inactive", "Prospect"];

const PRODUCT_CATEGORIES: &[(&str, &[&str], f64, f64)] = &[
    ("Vehicles", &["Sedan", "Hatchback", "Pickup", "SUV", "Van"], 18_000.0, 65_000.0),
    ("Parts", &["Brake Pad Set", "Alternator", "Radiator", "Timing Belt"], 40.0, 900.0),
    ("Accessories", &["Roof Rack", "Floor Mats", "Dash Cam", "Tow Hitch"], 25.0, 600.0),
    ("Tires", &["All-Season Tire", "Winter Tire", "Performance Tire"], 90.0, 350.0),
    ("Service Kits", &["Oil Change Kit", "Filter Kit", "Wiper Kit"], 20.0, 150.0),
];

const CAMPAIGN_TYPES: &[&str] = &["Email", "Social", "Event", "Print", "Digital Ads"];

const CAMPAIGN_THEMES: &[&str] = &["Spring", "Summer", "Year-End", "Fleet", "Trade-In", "Loyalty"];

const ORDER_STATUSES: &[&str] = &["Pending", "Processing", "Completed", "Completed", "Cancelled"];

const PAYMENT_STATUSES: &[&str] = &["Paid", "Paid", "Unpaid", "Partial"];

const TICKET_ISSUES: &[&str] = &[
    "Engine warning light", "Brake noise", "Infotainment not pairing", "Scheduled maintenance",
    "Warranty claim", "Tire pressure sensor fault", "Air conditioning weak",
];

const TICKET_STATUSES: &[&str] = &["Open", "In Progress", "Resolved", "Closed"];

const PRIORITIES: &[&str] = &["Low", "Medium", "High", "Urgent"];

const INVOICE_STATUSES: &[&str] = &["Paid", "Pending", "Overdue", "Partially Paid"];

const EXPENSE_CATEGORIES: &[&str] = &[
    "Payroll", "Rent", "Utilities", "Marketing", "Inventory", "Maintenance", "Travel",
];

const EXPENSE_DESCRIPTIONS: &[&str] = &[
    "Monthly showroom lease", "Trade show booth", "Parts restock", "Technician overtime",
    "Client dinner", "Lift inspection", "Radio spot",
];

const EXPENSE_STATUSES: &[&str] = &["Approved", "Approved", "Pending", "Rejected"];

const PAYMENT_METHODS: &[&str] = &["Credit Card", "Bank Transfer", "Cash", "Check", "Financing"];

const PAYMENT_RECORD_STATUSES: &[&str] = &["Completed", "Completed", "Pending", "Failed", "Refunded"];

const TASK_DESCRIPTIONS: &[&str] = &[
    "Follow up on test drive", "Prepare monthly P&L", "Reorder winter tires",
    "Review campaign results", "Call back about warranty", "Update staff roster",
    "Send quote to fleet client",
];

const TASK_STATUSES: &[&str] = &["Pending", "In Progress", "Completed"];

const MODULES: &[&str] = &["CRM", "Sales", "Inventory", "Finance", "Marketing", "Service", "Team"];

/// Number of records generated per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSizes {
    pub users: usize,
    pub customers: usize,
    pub products: usize,
    pub campaigns: usize,
    pub leads: usize,
    pub sales_orders: usize,
    pub service_tickets: usize,
    pub invoices: usize,
    pub expenses: usize,
    pub payments: usize,
    pub tasks: usize,
}

impl Default for SeedSizes {
    fn default() -> Self {
        Self {
            users: 12,
            customers: 40,
            products: 30,
            campaigns: 10,
            leads: 60,
            sales_orders: 50,
            service_tickets: 35,
            invoices: 45,
            expenses: 40,
            payments: 40,
            tasks: 30,
        }
    }
}

/// Generates a consistent set of collections from a seed.
///
/// The same seed, sizes and anchor always produce identical collections.
/// References between kinds (`assignedTo`, `customerId`, line items) point
/// at records generated in the same run.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use mock_source::Seeder;
///
/// let anchor = Utc::now();
/// let first = Seeder::new(7, anchor).generate();
/// let second = Seeder::new(7, anchor).generate();
/// assert_eq!(first, second);
/// ```
pub struct Seeder {
    rng: StdRng,
    anchor: DateTime<Utc>,
    sizes: SeedSizes,
}

impl Seeder {
    /// Create a seeder whose generated dates lie before `anchor`.
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self::with_sizes(seed, anchor, SeedSizes::default())
    }

    pub fn with_sizes(seed: u64, anchor: DateTime<Utc>, sizes: SeedSizes) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            anchor,
            sizes,
        }
    }

    /// Generate every collection.
    pub fn generate(mut self) -> Collections {
        let mut collections = Collections::default();

        collections.users = self.users();
        let user_ids: Vec<String> = collections.users.iter().map(|u| u.id.clone()).collect();

        collections.customers = self.customers();
        collections.products = self.products();
        collections.campaigns = self.campaigns();

        let campaign_ids: Vec<String> = collections.campaigns.iter().map(|c| c.id.clone()).collect();
        collections.leads = self.leads(&user_ids, &campaign_ids);

        let customer_ids: Vec<String> = collections.customers.iter().map(|c| c.id.clone()).collect();
        collections.sales_orders = self.sales_orders(&customer_ids, &collections.products);
        collections.service_tickets = self.service_tickets(&customer_ids, &user_ids);
        collections.invoices = self.invoices(&customer_ids);
        collections.expenses = self.expenses(&user_ids);

        let customer_names: Vec<String> =
            collections.customers.iter().map(|c| c.name.clone()).collect();
        collections.payments = self.payments(&customer_names);
        collections.tasks = self.tasks(&user_ids);

        collections
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.rng.gen_range(0..items.len())]
    }

    fn pick_id(&mut self, ids: &[String]) -> Option<String> {
        if ids.is_empty() {
            return None;
        }
        Some(ids[self.rng.gen_range(0..ids.len())].clone())
    }

    fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    fn days_ago(&mut self, max_days: i64) -> DateTime<Utc> {
        let days = self.rng.gen_range(0..=max_days);
        let minutes = self.rng.gen_range(0..24 * 60);
        self.anchor - Duration::days(days) - Duration::minutes(minutes)
    }

    fn money(&mut self, low: f64, high: f64) -> f64 {
        round_cents(self.rng.gen_range(low..high))
    }

    fn users(&mut self) -> Vec<User> {
        (1..=self.sizes.users)
            .map(|n| {
                let name = self.person_name();
                let user_type = if self.rng.gen_bool(0.8) {
                    UserType::DealerStaff
                } else {
                    UserType::BrandRepresentative
                };
                User {
                    id: format!("user-{:03}", n),
                    email: email_for(&name, "dealer.example"),
                    name,
                    role: self.pick(ROLES).to_string(),
                    user_type,
                    last_activity: self.days_ago(45),
                    created_at: self.days_ago(900),
                    updated_at: None,
                }
            })
            .collect()
    }

    fn customers(&mut self) -> Vec<Customer> {
        (1..=self.sizes.customers)
            .map(|n| {
                let name = self.person_name();
                let total_purchases = self.rng.gen_range(0..25u32);
                let per_purchase = self.money(500.0, 5_000.0);
                Customer {
                    id: format!("cust-{:03}", n),
                    email: Some(email_for(&name, "mail.example")),
                    name,
                    company: self.pick(COMPANIES).to_string(),
                    classification: self.pick(CLASSIFICATIONS).to_string(),
                    status: self.pick(CUSTOMER_STATUSES).to_string(),
                    total_purchases,
                    total_spent: round_cents(per_purchase * f64::from(total_purchases)),
                    created_at: self.days_ago(720),
                    updated_at: None,
                }
            })
            .collect()
    }

    fn products(&mut self) -> Vec<Product> {
        (1..=self.sizes.products)
            .map(|n| {
                let (category, names, low, high) =
                    PRODUCT_CATEGORIES[self.rng.gen_range(0..PRODUCT_CATEGORIES.len())];
                let current_stock = self.rng.gen_range(0..120u32);
                let reorder_point = self.rng.gen_range(5..25u32);
                Product {
                    id: format!("prod-{:03}", n),
                    name: self.pick(names).to_string(),
                    category: category.to_string(),
                    sku: format!("SKU-{:05}", 10_000 + n),
                    price: self.money(low, high),
                    current_stock,
                    reorder_point,
                    status: StockStatus::derive(current_stock, reorder_point),
                    created_at: self.days_ago(540),
                    updated_at: None,
                }
            })
            .collect()
    }

    fn campaigns(&mut self) -> Vec<MarketingCampaign> {
        (1..=self.sizes.campaigns)
            .map(|n| {
                let campaign_type = self.pick(CAMPAIGN_TYPES);
                let start_date = self.days_ago(300);
                let end_date = start_date + Duration::days(self.rng.gen_range(14..60));
                let status = if end_date < self.anchor {
                    "Completed"
                } else {
                    "Active"
                };
                let budget = self.money(2_000.0, 25_000.0);
                let actual_spend = round_cents(budget * self.rng.gen_range(0.4..1.1));
                let leads_generated = self.rng.gen_range(5..120u32);
                let roi = if actual_spend > 0.0 {
                    round_cents((f64::from(leads_generated) * 250.0 - actual_spend) / actual_spend)
                } else {
                    0.0
                };
                MarketingCampaign {
                    id: format!("camp-{:03}", n),
                    name: format!("{} {} Push", self.pick(CAMPAIGN_THEMES), campaign_type),
                    campaign_type: campaign_type.to_string(),
                    start_date,
                    end_date,
                    status: status.to_string(),
                    budget,
                    actual_spend,
                    leads_generated,
                    roi,
                    updated_at: None,
                }
            })
            .collect()
    }

    fn leads(&mut self, user_ids: &[String], campaign_ids: &[String]) -> Vec<Lead> {
        (1..=self.sizes.leads)
            .map(|n| {
                let name = self.person_name();
                let status = LeadStatus::ALL[self.rng.gen_range(0..LeadStatus::ALL.len())];
                let campaign_id = if self.rng.gen_bool(0.4) {
                    self.pick_id(campaign_ids)
                } else {
                    None
                };
                let source = if campaign_id.is_some() {
                    "Campaign"
                } else {
                    self.pick(LEAD_SOURCES)
                };
                let assigned_to = if self.rng.gen_bool(0.75) {
                    self.pick_id(user_ids)
                } else {
                    None
                };
                let created_at = self.days_ago(365);
                let last_activity =
                    (created_at + Duration::days(self.rng.gen_range(0..30))).min(self.anchor);
                let disqualification_reason = (status == LeadStatus::Disqualified)
                    .then(|| self.pick(DISQUALIFICATION_REASONS).to_string());
                Lead {
                    id: format!("lead-{:03}", n),
                    email: Some(email_for(&name, "prospect.example")),
                    name,
                    company: self.pick(COMPANIES).to_string(),
                    status,
                    source: source.to_string(),
                    campaign_id,
                    assigned_to,
                    estimated_value: self.money(5_000.0, 80_000.0),
                    created_at,
                    last_activity,
                    disqualification_reason,
                    updated_at: None,
                }
            })
            .collect()
    }

    fn sales_orders(&mut self, customer_ids: &[String], products: &[Product]) -> Vec<SalesOrder> {
        (1..=self.sizes.sales_orders)
            .map(|n| {
                let line_count = if products.is_empty() {
                    0
                } else {
                    self.rng.gen_range(1..=3)
                };
                let items: Vec<OrderItem> = (0..line_count)
                    .map(|_| {
                        let product = &products[self.rng.gen_range(0..products.len())];
                        OrderItem {
                            product_id: product.id.clone(),
                            quantity: self.rng.gen_range(1..=3),
                            unit_price: product.price,
                        }
                    })
                    .collect();
                let total_value = round_cents(
                    items
                        .iter()
                        .map(|item| item.unit_price * f64::from(item.quantity))
                        .sum(),
                );
                SalesOrder {
                    id: format!("so-{:03}", n),
                    customer_id: self.pick_id(customer_ids).unwrap_or_default(),
                    order_date: self.days_ago(365),
                    total_value,
                    status: self.pick(ORDER_STATUSES).to_string(),
                    payment_status: self.pick(PAYMENT_STATUSES).to_string(),
                    items,
                    updated_at: None,
                }
            })
            .collect()
    }

    fn service_tickets(&mut self, customer_ids: &[String], user_ids: &[String]) -> Vec<ServiceTicket> {
        (1..=self.sizes.service_tickets)
            .map(|n| {
                let status = self.pick(TICKET_STATUSES);
                let created_at = self.days_ago(180);
                let (resolved_at, resolution_time_hours) = if matches!(status, "Resolved" | "Closed") {
                    let hours = self.rng.gen_range(1..96);
                    (
                        Some(created_at + Duration::hours(hours)),
                        Some(hours as f64),
                    )
                } else {
                    (None, None)
                };
                let assigned_to = if self.rng.gen_bool(0.7) {
                    self.pick_id(user_ids)
                } else {
                    None
                };
                ServiceTicket {
                    id: format!("tkt-{:03}", n),
                    customer_id: self.pick_id(customer_ids).unwrap_or_default(),
                    issue: self.pick(TICKET_ISSUES).to_string(),
                    status: status.to_string(),
                    priority: self.pick(PRIORITIES).to_string(),
                    assigned_to,
                    created_at,
                    resolved_at,
                    resolution_time_hours,
                    updated_at: None,
                }
            })
            .collect()
    }

    fn invoices(&mut self, customer_ids: &[String]) -> Vec<Invoice> {
        (1..=self.sizes.invoices)
            .map(|n| {
                let date_issued = self.days_ago(365);
                let total_amount = self.money(500.0, 20_000.0);
                let status = self.pick(INVOICE_STATUSES);
                let amount_due = match status {
                    "Paid" => 0.0,
                    "Partially Paid" => round_cents(total_amount * self.rng.gen_range(0.3..0.7)),
                    _ => total_amount,
                };
                Invoice {
                    id: format!("inv-{:04}", 1000 + n),
                    customer_id: self.pick_id(customer_ids).unwrap_or_default(),
                    date_issued,
                    due_date: date_issued + Duration::days(30),
                    total_amount,
                    amount_due,
                    status: status.to_string(),
                    updated_at: None,
                }
            })
            .collect()
    }

    fn expenses(&mut self, user_ids: &[String]) -> Vec<Expense> {
        (1..=self.sizes.expenses)
            .map(|n| {
                let status = self.pick(EXPENSE_STATUSES);
                Expense {
                    id: format!("exp-{:03}", n),
                    date: self.days_ago(365),
                    category: self.pick(EXPENSE_CATEGORIES).to_string(),
                    description: self.pick(EXPENSE_DESCRIPTIONS).to_string(),
                    amount: self.money(100.0, 15_000.0),
                    status: status.to_string(),
                    approved: status == "Approved",
                    submitted_by: self.pick_id(user_ids),
                    updated_at: None,
                }
            })
            .collect()
    }

    fn payments(&mut self, customer_names: &[String]) -> Vec<Payment> {
        (1..=self.sizes.payments)
            .map(|n| {
                let status = self.pick(PAYMENT_RECORD_STATUSES);
                let date = if status == "Pending" && self.rng.gen_bool(0.5) {
                    None
                } else {
                    Some(self.days_ago(365))
                };
                Payment {
                    id: format!("pay-{:03}", n),
                    customer: self.pick_id(customer_names).unwrap_or_default(),
                    amount: self.money(200.0, 30_000.0),
                    method: self.pick(PAYMENT_METHODS).to_string(),
                    status: status.to_string(),
                    date,
                    updated_at: None,
                }
            })
            .collect()
    }

    fn tasks(&mut self, user_ids: &[String]) -> Vec<Task> {
        (1..=self.sizes.tasks)
            .map(|n| {
                let created_at = self.days_ago(60);
                let due_date = created_at + Duration::days(self.rng.gen_range(1..45));
                let assigned_to = if self.rng.gen_bool(0.8) {
                    self.pick_id(user_ids)
                } else {
                    None
                };
                Task {
                    id: format!("task-{:03}", n),
                    description: self.pick(TASK_DESCRIPTIONS).to_string(),
                    due_date,
                    status: self.pick(TASK_STATUSES).to_string(),
                    assigned_to,
                    module: self.pick(MODULES).to_string(),
                    created_at,
                    updated_at: None,
                }
            })
            .collect()
    }
}

fn email_for(name: &str, domain: &str) -> String {
    let local: String = name
        .chars()
        .map(|c| if c == ' ' { '.' } else { c.to_ascii_lowercase() })
        .collect();
    format!("{}@{}", local, domain)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_core::EntityKind;

    fn anchor() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-30T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_same_seed_same_data() {
        let first = Seeder::new(42, anchor()).generate();
        let second = Seeder::new(42, anchor()).generate();
        assert_eq!(first, second);

        let other = Seeder::new(43, anchor()).generate();
        assert_ne!(first, other);
    }

    #[test]
    fn test_sizes_respected() {
        let sizes = SeedSizes {
            leads: 3,
            tasks: 0,
            ..SeedSizes::default()
        };
        let collections = Seeder::with_sizes(1, anchor(), sizes).generate();
        assert_eq!(collections.count(EntityKind::Lead), 3);
        assert_eq!(collections.count(EntityKind::Task), 0);
        assert_eq!(collections.count(EntityKind::User), sizes.users);
    }

    #[test]
    fn test_references_point_at_seeded_records() {
        let collections = Seeder::new(9, anchor()).generate();

        for lead in &collections.leads {
            if let Some(user) = &lead.assigned_to {
                assert!(collections.users.iter().any(|u| &u.id == user));
            }
            assert_eq!(
                lead.disqualification_reason.is_some(),
                lead.status == LeadStatus::Disqualified
            );
        }
        for invoice in &collections.invoices {
            assert!(collections.customers.iter().any(|c| c.id == invoice.customer_id));
            assert!(invoice.amount_due <= invoice.total_amount);
        }
        for ticket in &collections.service_tickets {
            if let Some(resolved_at) = ticket.resolved_at {
                assert!(resolved_at >= ticket.created_at);
            }
        }
        for campaign in &collections.campaigns {
            assert!(campaign.end_date >= campaign.start_date);
        }
    }

    #[test]
    fn test_dates_never_after_anchor() {
        let collections = Seeder::new(5, anchor()).generate();
        assert!(collections.leads.iter().all(|l| l.created_at <= anchor()));
        assert!(collections.invoices.iter().all(|i| i.date_issued <= anchor()));
    }
}
