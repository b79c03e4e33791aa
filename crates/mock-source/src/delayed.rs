//! Delayed source implementation - wraps another source with artificial latency.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_core::{Collections, EntityKind, EntityRecord, EntitySource, Fetched, SourceError};
use serde_json::{Map, Value};
use tokio::time::sleep;

/// A source that wraps another source and adds artificial delay to every call.
///
/// Stands in for network latency of a remote backend.
pub struct DelayedSource<S: EntitySource> {
    inner: S,
    delay: Duration,
}

impl<S: EntitySource> DelayedSource<S> {
    /// Create a new DelayedSource wrapping the given source with the specified delay.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a source with a delay in milliseconds.
    pub fn with_millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Access the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: EntitySource> EntitySource for DelayedSource<S> {
    async fn fetch(&self, kind: EntityKind) -> Result<Fetched, SourceError> {
        sleep(self.delay).await;
        let mut fetched = self.inner.fetch(kind).await?;
        fetched.latency += self.delay;
        Ok(fetched)
    }

    async fn create(&self, record: EntityRecord, now: DateTime<Utc>) -> Result<EntityRecord, SourceError> {
        sleep(self.delay).await;
        self.inner.create(record, now).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<EntityRecord, SourceError> {
        sleep(self.delay).await;
        self.inner.update(kind, id, patch, now).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), SourceError> {
        sleep(self.delay).await;
        self.inner.delete(kind, id).await
    }

    async fn restore(&self, collections: Collections) -> Result<(), SourceError> {
        sleep(self.delay).await;
        self.inner.restore(collections).await
    }

    fn name(&self) -> &str {
        "DelayedSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemorySource;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_delayed_fetch_reports_latency() {
        let source = DelayedSource::with_millis(InMemorySource::default(), 250);

        let start = Instant::now();
        let fetched = source.fetch(EntityKind::Task).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(250));
        assert_eq!(fetched.latency, Duration::from_millis(250));
        assert!(fetched.data.is_empty());
    }

    #[test]
    fn test_source_name() {
        let source = DelayedSource::with_millis(InMemorySource::default(), 0);
        assert_eq!(source.name(), "DelayedSource");
    }
}
