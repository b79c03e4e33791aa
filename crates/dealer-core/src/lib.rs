//! Core types for the dealer entity store.
//!
//! This crate provides the shared vocabulary for every layer of the store:
//!
//! - [`EntityKind`] and the eleven entity records ([`Lead`], [`Invoice`], ...)
//! - [`Collections`] - one vector per kind, plus kind-erased carriers
//!   ([`EntitySet`], [`EntityRecord`])
//! - [`EntitySource`] - the trait every backend implements
//! - [`StoreSnapshot`] - the persisted store document
//!
//! # Example
//!
//! ```rust
//! use dealer_core::{EntityKind, Lead, LeadStatus, Collections, Stored};
//!
//! let mut collections = Collections::default();
//! collections.upsert(Lead {
//!     id: "lead-1".to_string(),
//!     status: LeadStatus::Qualified,
//!     ..Default::default()
//! }.into_record());
//!
//! assert_eq!(collections.count(EntityKind::Lead), 1);
//! ```

mod collections;
mod entity;
mod error;
mod kind;
mod snapshot;
mod source;

pub use collections::{apply_patch, Collections, EntityRecord, EntitySet, RecordFilter, Stored};
pub use entity::{
    Customer, Entity, Expense, FieldValue, Invoice, Lead, LeadStatus, MarketingCampaign, OrderItem,
    Payment, Product, SalesOrder, ServiceTicket, StockStatus, Task, User, UserType,
};
pub use error::{SnapshotError, SourceError};
pub use kind::{EntityKind, UnknownKind};
pub use snapshot::{StoreSnapshot, SNAPSHOT_VERSION};
pub use source::{EntitySource, Fetched};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
