//! The data source contract.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::collections::{Collections, EntityRecord, EntitySet};
use crate::error::SourceError;
use crate::kind::EntityKind;

/// A raw collection read from a source.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// The unfiltered collection.
    pub data: EntitySet,
    /// Time the source spent producing it (zero for in-process sources).
    pub latency: Duration,
}

impl Fetched {
    pub fn immediate(data: EntitySet) -> Self {
        Self {
            data,
            latency: Duration::ZERO,
        }
    }
}

/// A backend holding the canonical collection for every entity kind.
///
/// Implementations range from the seeded in-memory repository to a remote
/// database. This trait is object-safe and can be used with `Arc<dyn EntitySource>`.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Read the full, unfiltered collection of one kind.
    async fn fetch(&self, kind: EntityKind) -> Result<Fetched, SourceError>;

    /// Store a new record. The source assigns a fresh id, stamps creation at
    /// `now` and returns the record as stored.
    async fn create(&self, record: EntityRecord, now: DateTime<Utc>) -> Result<EntityRecord, SourceError>;

    /// Merge a JSON patch into an existing record, stamping the update at `now`.
    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<EntityRecord, SourceError>;

    /// Delete a record. Deleting a missing id succeeds without effect.
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), SourceError>;

    /// Replace every canonical collection, e.g. with a restored snapshot.
    async fn restore(&self, collections: Collections) -> Result<(), SourceError>;

    /// Get a human-readable name for this source.
    fn name(&self) -> &str;
}
