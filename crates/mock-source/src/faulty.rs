//! Failure injection for exercising error paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_core::{Collections, EntityKind, EntityRecord, EntitySource, Fetched, SourceError};
use serde_json::{Map, Value};
use tracing::warn;

/// A source that fails every call while switched on.
///
/// Starts healthy; flip it with [`FaultySource::set_failing`].
pub struct FaultySource<S: EntitySource> {
    inner: S,
    failing: AtomicBool,
}

impl<S: EntitySource> FaultySource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &str) -> Result<(), SourceError> {
        if self.is_failing() {
            warn!("Injected failure for {}", operation);
            return Err(SourceError::Unavailable(format!("injected failure: {}", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: EntitySource> EntitySource for FaultySource<S> {
    async fn fetch(&self, kind: EntityKind) -> Result<Fetched, SourceError> {
        self.check("fetch")?;
        self.inner.fetch(kind).await
    }

    async fn create(&self, record: EntityRecord, now: DateTime<Utc>) -> Result<EntityRecord, SourceError> {
        self.check("create")?;
        self.inner.create(record, now).await
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<EntityRecord, SourceError> {
        self.check("update")?;
        self.inner.update(kind, id, patch, now).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), SourceError> {
        self.check("delete")?;
        self.inner.delete(kind, id).await
    }

    async fn restore(&self, collections: Collections) -> Result<(), SourceError> {
        self.check("restore")?;
        self.inner.restore(collections).await
    }

    fn name(&self) -> &str {
        "FaultySource"
    }
}
