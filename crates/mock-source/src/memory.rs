//! In-memory entity repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_core::{
    Collections, EntityKind, EntityRecord, EntitySource, Fetched, SourceError,
};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::seed::{SeedSizes, Seeder};

/// A source that keeps the canonical collections in process memory.
///
/// Creates assign a UUID v4 id and creation stamp, updates merge JSON
/// patches, and deleting an unknown id is a no-op.
#[derive(Debug, Default)]
pub struct InMemorySource {
    collections: RwLock<Collections>,
}

impl InMemorySource {
    /// Create a source holding the given collections.
    pub fn new(collections: Collections) -> Self {
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Create a source seeded with synthetic data dated before `anchor`.
    pub fn seeded(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self::new(Seeder::new(seed, anchor).generate())
    }

    /// Create a seeded source with custom collection sizes.
    pub fn seeded_with_sizes(seed: u64, anchor: DateTime<Utc>, sizes: SeedSizes) -> Self {
        Self::new(Seeder::with_sizes(seed, anchor, sizes).generate())
    }

    /// Clone out every collection.
    pub async fn snapshot(&self) -> Collections {
        self.collections.read().await.clone()
    }
}

#[async_trait]
impl EntitySource for InMemorySource {
    async fn fetch(&self, kind: EntityKind) -> Result<Fetched, SourceError> {
        let data = self.collections.read().await.set(kind);
        debug!("Read {} {} from memory", data.len(), kind.label());
        Ok(Fetched::immediate(data))
    }

    async fn create(&self, mut record: EntityRecord, now: DateTime<Utc>) -> Result<EntityRecord, SourceError> {
        record.set_id(Uuid::new_v4().to_string());
        record.stamp_created(now);
        record.normalize();

        self.collections.write().await.upsert(record.clone());
        debug!("Created {} {}", record.kind(), record.id());
        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<EntityRecord, SourceError> {
        let mut collections = self.collections.write().await;
        let existing = collections.get(kind, id).ok_or_else(|| SourceError::NotFound {
            kind,
            id: id.to_string(),
        })?;

        let mut updated = existing.patched(patch)?;
        updated.touch(now);
        updated.normalize();

        collections.upsert(updated.clone());
        debug!("Updated {} {}", kind, id);
        Ok(updated)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), SourceError> {
        let removed = self.collections.write().await.remove(kind, id);
        debug!("Delete {} {} (removed: {})", kind, id, removed);
        Ok(())
    }

    async fn restore(&self, collections: Collections) -> Result<(), SourceError> {
        debug!("Restoring {} records into memory", collections.total());
        *self.collections.write().await = collections;
        Ok(())
    }

    fn name(&self) -> &str {
        "InMemorySource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_core::{Lead, LeadStatus, Stored};
    use serde_json::json;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn source_with_lead() -> InMemorySource {
        let mut collections = Collections::default();
        collections.leads.push(Lead {
            id: "lead-1".to_string(),
            name: "Ada".to_string(),
            ..Default::default()
        });
        InMemorySource::new(collections)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_stamp() {
        let source = InMemorySource::default();
        let draft = Lead {
            id: "ignored".to_string(),
            name: "Bo".to_string(),
            ..Default::default()
        };

        let now = at("2024-01-31T09:30:00Z");
        let created = source.create(draft.into_record(), now).await.unwrap();
        let created = Lead::from_record(created).unwrap();

        assert_ne!(created.id, "ignored");
        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.created_at, now);

        let fetched = source.fetch(EntityKind::Lead).await.unwrap();
        assert_eq!(fetched.data.ids(), vec![created.id]);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let source = source_with_lead();
        let patch = json!({ "status": "Pitched" });

        let updated = source
            .update(EntityKind::Lead, "lead-1", patch.as_object().unwrap(), at("2024-02-01T00:00:00Z"))
            .await
            .unwrap();
        let updated = Lead::from_record(updated).unwrap();

        assert_eq!(updated.status, LeadStatus::Pitched);
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.updated_at, Some(at("2024-02-01T00:00:00Z")));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let source = source_with_lead();
        let result = source
            .update(EntityKind::Lead, "nope", &Map::new(), Utc::now())
            .await;
        assert!(matches!(result, Err(SourceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let source = source_with_lead();

        source.delete(EntityKind::Lead, "lead-1").await.unwrap();
        source.delete(EntityKind::Lead, "lead-1").await.unwrap();
        source.delete(EntityKind::Invoice, "never-existed").await.unwrap();

        assert!(source.fetch(EntityKind::Lead).await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn test_restore_replaces_everything() {
        let source = InMemorySource::seeded(3, at("2024-01-31T00:00:00Z"));
        let mut restored = Collections::default();
        restored.leads.push(Lead {
            id: "kept".to_string(),
            ..Default::default()
        });

        source.restore(restored.clone()).await.unwrap();

        assert_eq!(source.snapshot().await, restored);
        assert!(source
            .update(EntityKind::Lead, "kept", &Map::new(), Utc::now())
            .await
            .is_ok());
    }
}
