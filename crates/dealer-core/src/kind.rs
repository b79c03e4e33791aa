//! Entity kind tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eleven business entity types held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Lead,
    Customer,
    Product,
    SalesOrder,
    MarketingCampaign,
    ServiceTicket,
    Invoice,
    Expense,
    Payment,
    User,
    Task,
}

impl EntityKind {
    /// Every kind, in seeding order (referenced kinds first).
    pub const ALL: [EntityKind; 11] = [
        EntityKind::User,
        EntityKind::Customer,
        EntityKind::Product,
        EntityKind::Lead,
        EntityKind::SalesOrder,
        EntityKind::MarketingCampaign,
        EntityKind::ServiceTicket,
        EntityKind::Invoice,
        EntityKind::Expense,
        EntityKind::Payment,
        EntityKind::Task,
    ];

    /// Collection name used by UI layers and persisted snapshots.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Lead => "leads",
            Self::Customer => "customers",
            Self::Product => "products",
            Self::SalesOrder => "salesOrders",
            Self::MarketingCampaign => "campaigns",
            Self::ServiceTicket => "serviceTickets",
            Self::Invoice => "invoices",
            Self::Expense => "expenses",
            Self::Payment => "payments",
            Self::User => "users",
            Self::Task => "tasks",
        }
    }

    /// Human-readable plural used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lead => "leads",
            Self::Customer => "customers",
            Self::Product => "products",
            Self::SalesOrder => "sales orders",
            Self::MarketingCampaign => "marketing campaigns",
            Self::ServiceTicket => "service tickets",
            Self::Invoice => "invoices",
            Self::Expense => "expenses",
            Self::Payment => "payments",
            Self::User => "users",
            Self::Task => "tasks",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Error returned when a collection name does not match any entity kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    /// Accepts collection names case-insensitively, with or without separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        let kind = match normalized.as_str() {
            "lead" | "leads" => Self::Lead,
            "customer" | "customers" => Self::Customer,
            "product" | "products" | "inventory" => Self::Product,
            "salesorder" | "salesorders" | "order" | "orders" => Self::SalesOrder,
            "campaign" | "campaigns" | "marketingcampaign" | "marketingcampaigns" => {
                Self::MarketingCampaign
            }
            "ticket" | "tickets" | "serviceticket" | "servicetickets" => Self::ServiceTicket,
            "invoice" | "invoices" => Self::Invoice,
            "expense" | "expenses" => Self::Expense,
            "payment" | "payments" => Self::Payment,
            "user" | "users" => Self::User,
            "task" | "tasks" => Self::Task,
            _ => return Err(UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_collection_names() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.collection().parse::<EntityKind>(), Ok(kind));
        }
        assert_eq!("sales_orders".parse(), Ok(EntityKind::SalesOrder));
        assert_eq!("Service-Tickets".parse(), Ok(EntityKind::ServiceTicket));
        assert!("widgets".parse::<EntityKind>().is_err());
    }
}
