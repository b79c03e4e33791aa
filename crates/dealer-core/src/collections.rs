//! The per-kind collections and kind-erased carriers.
//!
//! [`EntitySet`] and [`EntityRecord`] carry a typed collection or record across
//! the [`EntitySource`](crate::EntitySource) boundary, which cannot be generic
//! over the entity type. [`Stored`] maps each entity type back to its slot.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{
    Customer, Entity, Expense, Invoice, Lead, MarketingCampaign, Payment, Product, SalesOrder,
    ServiceTicket, Task, User,
};
use crate::kind::EntityKind;

/// Entity types that live in a [`Collections`] slot.
pub trait Stored: Entity + Serialize + DeserializeOwned {
    fn slice(collections: &Collections) -> &[Self];
    fn slice_mut(collections: &mut Collections) -> &mut Vec<Self>;
    fn into_record(self) -> EntityRecord;
    fn from_record(record: EntityRecord) -> Option<Self>;
    fn into_set(items: Vec<Self>) -> EntitySet;
    fn from_set(set: EntitySet) -> Option<Vec<Self>>;
}

/// A per-item test applied across a kind-erased set.
pub trait RecordFilter {
    fn keep<T: Stored>(&self, item: &T) -> bool;
}

macro_rules! collections {
    ($($ty:ident => $field:ident),* $(,)?) => {
        /// One vector per entity kind.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct Collections {
            $(pub $field: Vec<$ty>,)*
        }

        /// A whole collection of one kind.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum EntitySet {
            $($ty(Vec<$ty>),)*
        }

        /// A single record of one kind.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum EntityRecord {
            $($ty($ty),)*
        }

        $(
            impl Stored for $ty {
                fn slice(collections: &Collections) -> &[Self] {
                    &collections.$field
                }

                fn slice_mut(collections: &mut Collections) -> &mut Vec<Self> {
                    &mut collections.$field
                }

                fn into_record(self) -> EntityRecord {
                    EntityRecord::$ty(self)
                }

                fn from_record(record: EntityRecord) -> Option<Self> {
                    match record {
                        EntityRecord::$ty(item) => Some(item),
                        _ => None,
                    }
                }

                fn into_set(items: Vec<Self>) -> EntitySet {
                    EntitySet::$ty(items)
                }

                fn from_set(set: EntitySet) -> Option<Vec<Self>> {
                    match set {
                        EntitySet::$ty(items) => Some(items),
                        _ => None,
                    }
                }
            }
        )*

        impl EntitySet {
            pub fn empty(kind: EntityKind) -> Self {
                match kind {
                    $(EntityKind::$ty => Self::$ty(Vec::new()),)*
                }
            }

            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Self::$ty(_) => EntityKind::$ty,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(Self::$ty(items) => items.len(),)*
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            pub fn ids(&self) -> Vec<String> {
                match self {
                    $(Self::$ty(items) => items.iter().map(|i| i.id().to_string()).collect(),)*
                }
            }

            /// Keep only the items the filter accepts, preserving order.
            pub fn retain<F: RecordFilter>(&mut self, filter: &F) {
                match self {
                    $(Self::$ty(items) => items.retain(|item| filter.keep(item)),)*
                }
            }

            /// Parse a JSON array into a set of the given kind.
            pub fn from_json(kind: EntityKind, value: Value) -> Result<Self, serde_json::Error> {
                match kind {
                    $(EntityKind::$ty => Ok(Self::$ty(serde_json::from_value(value)?)),)*
                }
            }
        }

        impl EntityRecord {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Self::$ty(_) => EntityKind::$ty,)*
                }
            }

            pub fn id(&self) -> &str {
                match self {
                    $(Self::$ty(item) => item.id(),)*
                }
            }

            pub fn set_id(&mut self, id: String) {
                match self {
                    $(Self::$ty(item) => item.set_id(id),)*
                }
            }

            pub fn stamp_created(&mut self, now: DateTime<Utc>) {
                match self {
                    $(Self::$ty(item) => item.stamp_created(now),)*
                }
            }

            pub fn touch(&mut self, now: DateTime<Utc>) {
                match self {
                    $(Self::$ty(item) => item.touch(now),)*
                }
            }

            pub fn normalize(&mut self) {
                match self {
                    $(Self::$ty(item) => item.normalize(),)*
                }
            }

            /// Whether `filter` would keep this record in its set.
            pub fn accepted_by<F: RecordFilter>(&self, filter: &F) -> bool {
                match self {
                    $(Self::$ty(item) => filter.keep(item),)*
                }
            }

            /// Parse a (possibly partial) JSON object into a record of the given kind.
            pub fn from_json(kind: EntityKind, value: Value) -> Result<Self, serde_json::Error> {
                match kind {
                    $(EntityKind::$ty => Ok(Self::$ty(serde_json::from_value(value)?)),)*
                }
            }

            /// Merge a JSON patch over this record. The id never changes.
            pub fn patched(&self, patch: &Map<String, Value>) -> Result<Self, serde_json::Error> {
                match self {
                    $(Self::$ty(item) => Ok(Self::$ty(apply_patch(item, patch)?)),)*
                }
            }
        }

        impl Collections {
            pub fn count(&self, kind: EntityKind) -> usize {
                match kind {
                    $(EntityKind::$ty => self.$field.len(),)*
                }
            }

            /// Clone out the collection of one kind.
            pub fn set(&self, kind: EntityKind) -> EntitySet {
                match kind {
                    $(EntityKind::$ty => EntitySet::$ty(self.$field.clone()),)*
                }
            }

            /// Replace a whole slot.
            pub fn replace(&mut self, set: EntitySet) {
                match set {
                    $(EntitySet::$ty(items) => self.$field = items,)*
                }
            }

            pub fn get(&self, kind: EntityKind, id: &str) -> Option<EntityRecord> {
                match kind {
                    $(EntityKind::$ty => self
                        .$field
                        .iter()
                        .find(|item| item.id() == id)
                        .cloned()
                        .map(EntityRecord::$ty),)*
                }
            }

            /// Replace the record with the same id, or append it.
            pub fn upsert(&mut self, record: EntityRecord) {
                match record {
                    $(EntityRecord::$ty(item) => upsert_into(&mut self.$field, item),)*
                }
            }

            /// Remove a record by id. Returns whether anything was removed.
            pub fn remove(&mut self, kind: EntityKind, id: &str) -> bool {
                match kind {
                    $(EntityKind::$ty => remove_from(&mut self.$field, id),)*
                }
            }
        }
    };
}

collections! {
    Lead => leads,
    Customer => customers,
    Product => products,
    SalesOrder => sales_orders,
    MarketingCampaign => campaigns,
    ServiceTicket => service_tickets,
    Invoice => invoices,
    Expense => expenses,
    Payment => payments,
    User => users,
    Task => tasks,
}

impl Collections {
    /// Total number of records across every kind.
    pub fn total(&self) -> usize {
        EntityKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }
}

fn upsert_into<T: Entity>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

fn remove_from<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Merge `patch` over the serialized form of `record` and read it back.
pub fn apply_patch<T: Stored>(record: &T, patch: &Map<String, Value>) -> Result<T, serde_json::Error> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut value {
        for (key, patch_value) in patch {
            if key == "id" {
                continue;
            }
            fields.insert(key.clone(), patch_value.clone());
        }
    }
    let mut patched: T = serde_json::from_value(value)?;
    patched.set_id(record.id().to_string());
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::LeadStatus;
    use serde_json::json;

    fn lead(id: &str) -> Lead {
        Lead {
            id: id.to_string(),
            name: format!("Lead {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut collections = Collections::default();
        collections.upsert(lead("a").into_record());
        collections.upsert(lead("b").into_record());

        let mut renamed = lead("a");
        renamed.name = "Renamed".to_string();
        collections.upsert(renamed.into_record());

        assert_eq!(collections.count(EntityKind::Lead), 2);
        assert_eq!(collections.leads[0].name, "Renamed");

        assert!(collections.remove(EntityKind::Lead, "a"));
        assert!(!collections.remove(EntityKind::Lead, "a"));
        assert_eq!(collections.set(EntityKind::Lead).ids(), vec!["b".to_string()]);
    }

    #[test]
    fn test_patch_keeps_id() {
        let record = lead("a").into_record();
        let patch = json!({ "id": "other", "status": "Qualified", "estimatedValue": 1500.0 });
        let patched = record.patched(patch.as_object().unwrap()).unwrap();

        let patched = Lead::from_record(patched).unwrap();
        assert_eq!(patched.id, "a");
        assert_eq!(patched.status, LeadStatus::Qualified);
        assert_eq!(patched.estimated_value, 1500.0);
    }

    #[test]
    fn test_patch_rejects_wrong_types() {
        let record = lead("a").into_record();
        let patch = json!({ "estimatedValue": "lots" });
        assert!(record.patched(patch.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_collections_serialize_with_collection_names() {
        let mut collections = Collections::default();
        collections.upsert(lead("a").into_record());

        let value = serde_json::to_value(&collections).unwrap();
        assert!(value.get("salesOrders").is_some());
        assert!(value.get("serviceTickets").is_some());
        assert_eq!(value["leads"][0]["id"], json!("a"));
    }
}
