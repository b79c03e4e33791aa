//! Call recording for asserting how often a source is read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_core::{Collections, EntityKind, EntityRecord, EntitySource, Fetched, SourceError};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

/// A source that records every fetch before delegating.
pub struct RecordingSource<S: EntitySource> {
    inner: S,
    fetches: Mutex<Vec<EntityKind>>,
}

impl<S: EntitySource> RecordingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Kinds fetched so far, in call order.
    pub async fn fetches(&self) -> Vec<EntityKind> {
        self.fetches.lock().await.clone()
    }

    /// Number of fetches issued for one kind.
    pub async fn fetch_count(&self, kind: EntityKind) -> usize {
        self.fetches.lock().await.iter().filter(|k| **k == kind).count()
    }
}

#[async_trait]
impl<S: EntitySource> EntitySource for RecordingSource<S> {
    async fn fetch(&self, kind: EntityKind) -> Result<Fetched, SourceError> {
        self.fetches.lock().await.push(kind);
        self.inner.fetch(kind).await
    }

    async fn create(&self, record: EntityRecord, now: DateTime<Utc>) -> Result<EntityRecord, SourceError> {
        self.inner.create(record, now).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<EntityRecord, SourceError> {
        self.inner.update(kind, id, patch, now).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), SourceError> {
        self.inner.delete(kind, id).await
    }

    async fn restore(&self, collections: Collections) -> Result<(), SourceError> {
        self.inner.restore(collections).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemorySource;

    #[tokio::test]
    async fn test_counts_fetches_per_kind() {
        let source = RecordingSource::new(InMemorySource::default());
        source.fetch(EntityKind::Lead).await.unwrap();
        source.fetch(EntityKind::Lead).await.unwrap();
        source.fetch(EntityKind::Task).await.unwrap();

        assert_eq!(source.fetch_count(EntityKind::Lead).await, 2);
        assert_eq!(source.fetch_count(EntityKind::Task).await, 1);
        assert_eq!(source.fetches().await.len(), 3);
    }
}
