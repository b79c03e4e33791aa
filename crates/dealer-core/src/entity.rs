//! Entity records.
//!
//! Every record is a flat struct with a string `id`, serialized with camelCase
//! field names so snapshots and API payloads match what dashboard clients send.
//! Structs use `#[serde(default)]` so a partial JSON object can describe a
//! record to create.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::EntityKind;

/// A typed view of one field, used by exact-match filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    /// The entity has no such field, or the optional field is unset.
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Strict equality against a filter value. Types never coerce.
    pub fn matches(&self, expected: &Value) -> bool {
        match (self, expected) {
            (Self::Text(actual), Value::String(expected)) => *actual == expected.as_str(),
            (Self::Number(actual), Value::Number(expected)) => {
                expected.as_f64().is_some_and(|e| e == *actual)
            }
            (Self::Bool(actual), Value::Bool(expected)) => actual == expected,
            _ => false,
        }
    }

    fn opt(value: Option<&'a str>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

/// Behavior shared by all entity records.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Stamp the creation time. Entities whose only date is a business date
    /// (order date, issue date) keep the caller's value.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Stamp the last-modified audit time.
    fn touch(&mut self, now: DateTime<Utc>);

    /// The date the date-range predicate tests.
    fn primary_date(&self) -> Option<DateTime<Utc>>;

    /// Designated free-text fields for search.
    fn search_fields(&self) -> Vec<&str>;

    /// Field lookup by its camelCase name.
    fn field(&self, key: &str) -> FieldValue<'_>;

    fn assigned_to(&self) -> Option<&str> {
        None
    }

    /// Re-derive computed fields after a create or update.
    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Pitched,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Disqualified,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Pitched,
        Self::FollowUp,
        Self::Disqualified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Pitched => "Pitched",
            Self::FollowUp => "Follow-up",
            Self::Disqualified => "Disqualified",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: LeadStatus,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub estimated_value: f64,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualification_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Lead {
    const KIND: EntityKind = EntityKind::Lead;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.last_activity = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
        self.last_activity = now;
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.company.as_str(), self.source.as_str()];
        fields.extend(self.email.as_deref());
        fields
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "company" => FieldValue::Text(&self.company),
            "email" => FieldValue::opt(self.email.as_deref()),
            "status" => FieldValue::Text(self.status.as_str()),
            "source" => FieldValue::Text(&self.source),
            "campaignId" => FieldValue::opt(self.campaign_id.as_deref()),
            "assignedTo" => FieldValue::opt(self.assigned_to.as_deref()),
            "estimatedValue" => FieldValue::Number(self.estimated_value),
            "disqualificationReason" => FieldValue::opt(self.disqualification_reason.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub classification: String,
    pub status: String,
    pub total_purchases: u32,
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Customer {
    const KIND: EntityKind = EntityKind::Customer;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.company.as_str()];
        fields.extend(self.email.as_deref());
        fields
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "company" => FieldValue::Text(&self.company),
            "email" => FieldValue::opt(self.email.as_deref()),
            "classification" => FieldValue::Text(&self.classification),
            "status" => FieldValue::Text(&self.status),
            "totalPurchases" => FieldValue::Number(f64::from(self.total_purchases)),
            "totalSpent" => FieldValue::Number(self.total_spent),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        self.total_spent = self.total_spent.max(0.0);
    }
}

/// Stock status derived from current stock against the reorder point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn derive(current_stock: u32, reorder_point: u32) -> Self {
        if current_stock == 0 {
            Self::OutOfStock
        } else if current_stock <= reorder_point {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub sku: String,
    pub price: f64,
    pub current_stock: u32,
    pub reorder_point: u32,
    pub status: StockStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Value of the units on hand.
    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.current_stock)
    }
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.as_str(), self.sku.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "category" => FieldValue::Text(&self.category),
            "sku" => FieldValue::Text(&self.sku),
            "price" => FieldValue::Number(self.price),
            "currentStock" => FieldValue::Number(f64::from(self.current_stock)),
            "reorderPoint" => FieldValue::Number(f64::from(self.reorder_point)),
            "status" => FieldValue::Text(self.status.as_str()),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        self.status = StockStatus::derive(self.current_stock, self.reorder_point);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesOrder {
    pub id: String,
    pub customer_id: String,
    pub order_date: DateTime<Utc>,
    pub total_value: f64,
    pub status: String,
    pub payment_status: String,
    pub items: Vec<OrderItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for SalesOrder {
    const KIND: EntityKind = EntityKind::SalesOrder;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.order_date)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.customer_id.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "customerId" => FieldValue::Text(&self.customer_id),
            "totalValue" => FieldValue::Number(self.total_value),
            "status" => FieldValue::Text(&self.status),
            "paymentStatus" => FieldValue::Text(&self.payment_status),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        self.total_value = self.total_value.max(0.0);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingCampaign {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub budget: f64,
    pub actual_spend: f64,
    pub leads_generated: u32,
    pub roi: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for MarketingCampaign {
    const KIND: EntityKind = EntityKind::MarketingCampaign;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.start_date)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.campaign_type.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "type" => FieldValue::Text(&self.campaign_type),
            "status" => FieldValue::Text(&self.status),
            "budget" => FieldValue::Number(self.budget),
            "actualSpend" => FieldValue::Number(self.actual_spend),
            "leadsGenerated" => FieldValue::Number(f64::from(self.leads_generated)),
            "roi" => FieldValue::Number(self.roi),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        if self.end_date < self.start_date {
            self.end_date = self.start_date;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceTicket {
    pub id: String,
    pub customer_id: String,
    pub issue: String,
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_time_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ServiceTicket {
    const KIND: EntityKind = EntityKind::ServiceTicket;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.issue.as_str(), self.customer_id.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "customerId" => FieldValue::Text(&self.customer_id),
            "issue" => FieldValue::Text(&self.issue),
            "status" => FieldValue::Text(&self.status),
            "priority" => FieldValue::Text(&self.priority),
            "assignedTo" => FieldValue::opt(self.assigned_to.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    fn normalize(&mut self) {
        if let Some(resolved_at) = self.resolved_at {
            if resolved_at < self.created_at {
                self.resolved_at = Some(self.created_at);
            }
            if self.resolution_time_hours.is_none() {
                let minutes = (resolved_at.max(self.created_at) - self.created_at).num_minutes();
                self.resolution_time_hours = Some(minutes as f64 / 60.0);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub date_issued: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub total_amount: f64,
    pub amount_due: f64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Amount already collected against this invoice.
    pub fn amount_paid(&self) -> f64 {
        (self.total_amount - self.amount_due).max(0.0)
    }
}

impl Entity for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.date_issued)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.customer_id.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "customerId" => FieldValue::Text(&self.customer_id),
            "totalAmount" => FieldValue::Number(self.total_amount),
            "amountDue" => FieldValue::Number(self.amount_due),
            "status" => FieldValue::Text(&self.status),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        self.amount_due = self.amount_due.min(self.total_amount);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub status: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str(), self.description.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "category" => FieldValue::Text(&self.category),
            "description" => FieldValue::Text(&self.description),
            "amount" => FieldValue::Number(self.amount),
            "status" => FieldValue::Text(&self.status),
            "approved" => FieldValue::Bool(self.approved),
            "submittedBy" => FieldValue::opt(self.submitted_by.as_deref()),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        self.amount = self.amount.max(0.0);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub id: String,
    pub customer: String,
    pub amount: f64,
    pub method: String,
    pub status: String,
    /// Unset while a payment is still being scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Payment {
    const KIND: EntityKind = EntityKind::Payment;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.customer.as_str(), self.method.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "customer" => FieldValue::Text(&self.customer),
            "amount" => FieldValue::Number(self.amount),
            "method" => FieldValue::Text(&self.method),
            "status" => FieldValue::Text(&self.status),
            _ => FieldValue::Missing,
        }
    }

    fn normalize(&mut self) {
        self.amount = self.amount.max(0.0);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    #[serde(rename = "Dealer Staff")]
    DealerStaff,
    #[serde(rename = "Brand Representative")]
    BrandRepresentative,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealerStaff => "Dealer Staff",
            Self::BrandRepresentative => "Brand Representative",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.last_activity = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.role.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "email" => FieldValue::Text(&self.email),
            "role" => FieldValue::Text(&self.role),
            "type" => FieldValue::Text(self.user_type.as_str()),
            _ => FieldValue::Missing,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub module: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn primary_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.description.as_str(), self.module.as_str()]
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "id" => FieldValue::Text(&self.id),
            "description" => FieldValue::Text(&self.description),
            "status" => FieldValue::Text(&self.status),
            "assignedTo" => FieldValue::opt(self.assigned_to.as_deref()),
            "module" => FieldValue::Text(&self.module),
            _ => FieldValue::Missing,
        }
    }

    fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }
}
