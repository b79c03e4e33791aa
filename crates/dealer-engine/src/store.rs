//! The state container that UI layers talk to.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use database::{snapshot, Database};
use dealer_core::{
    Collections, EntityKind, EntityRecord, EntitySet, EntitySource, SourceError, StoreSnapshot,
    Stored,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::analytics::{self, Report, ReportKind};
use crate::clock::{Clock, SystemClock};
use crate::coalescer::{FetchCoalescer, PendingFetch};
use crate::config::{EngineConfig, StoreConfig};
use crate::error::EngineError;
use crate::params::FilterParams;
use crate::predicate::Predicate;

/// How [`DealerStore::hydrate`] populated the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Hydration {
    /// Loaded from a persisted snapshot.
    Restored,
    /// No snapshot existed; collections were read from the source.
    Seeded,
    /// A snapshot existed but could not be read, so it was replaced.
    Reseeded,
}

/// Result of a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MutationOutcome {
    pub fn ok(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: Some(id.into()),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(message.into()),
        }
    }
}

/// Serializable summary of volatile store state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreView {
    pub loading: bool,
    pub error: Option<String>,
    /// Committed record count per collection name.
    pub counts: IndexMap<String, usize>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Committed slices as last fetched, possibly filtered.
    collections: Collections,
    /// Unfiltered mirror of the source. This is what snapshots hold.
    repository: Collections,
    /// Predicate behind each kind's committed slice, when one was active.
    filters: HashMap<EntityKind, Predicate>,
    widgets: IndexMap<String, bool>,
    /// Actions currently between start and commit.
    in_flight: usize,
    error: Option<String>,
}

/// The single source of truth for dashboard data.
///
/// The store owns the committed collections exclusively. Fetches pass through
/// a per-kind [`FetchCoalescer`] and the [`Predicate`] built from the
/// caller's parameters before the filtered slice replaces the committed one.
/// Every successful change is persisted as a snapshot of the unfiltered
/// collections when a database is attached. Snapshot writes are serialized so
/// the stored document is never older than the last commit. Persistence
/// failures are logged and never surface to callers.
pub struct DealerStore {
    source: Arc<dyn EntitySource>,
    database: Option<Database>,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
    coalescer: FetchCoalescer,
    state: RwLock<StoreState>,
    persist_lock: Mutex<()>,
}

impl DealerStore {
    /// Create a store reading from `source`, without persistence.
    pub fn new(source: Arc<dyn EntitySource>, config: StoreConfig) -> Self {
        Self {
            source,
            database: None,
            clock: Arc::new(SystemClock),
            coalescer: FetchCoalescer::new(config.debounce),
            config,
            state: RwLock::new(StoreState::default()),
            persist_lock: Mutex::new(()),
        }
    }

    /// Persist snapshots to `database`.
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Resolve date ranges against `clock` instead of wall-clock time.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a store from engine configuration, connecting and migrating the
    /// snapshot database when one is configured.
    pub async fn from_config(
        source: Arc<dyn EntitySource>,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let store = Self::new(source, config.store_config());
        match &config.database_url {
            Some(url) => {
                let database = Database::connect(url).await?;
                database.migrate().await?;
                info!("Snapshot persistence enabled");
                Ok(store.with_database(database))
            }
            None => {
                info!("No snapshot database configured, state will not persist");
                Ok(store)
            }
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// The fetch coalescing window.
    pub fn debounce(&self) -> Duration {
        self.coalescer.window()
    }

    /// Populate the store from its snapshot, or from the source if there is
    /// no usable snapshot.
    pub async fn hydrate(&self) -> Hydration {
        let mut discarded = false;

        if let Some(database) = &self.database {
            match snapshot::get_snapshot(database.pool(), &self.config.storage_key).await {
                Ok(Some(record)) => match StoreSnapshot::from_json(&record.document) {
                    Ok(snapshot) => {
                        let saved_at = snapshot.saved_at;
                        match self.restore(snapshot).await {
                            Ok(()) => {
                                info!("Restored snapshot {} saved at {}", self.config.storage_key, saved_at);
                                return Hydration::Restored;
                            }
                            Err(e) => {
                                warn!("Source rejected snapshot {}: {}", self.config.storage_key, e);
                                discarded = true;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Discarding unreadable snapshot {}: {}", self.config.storage_key, e);
                        discarded = true;
                    }
                },
                Ok(None) => debug!("No snapshot stored under {}", self.config.storage_key),
                Err(e) => warn!("Failed to read snapshot {}: {}", self.config.storage_key, e),
            }
        }

        for kind in EntityKind::ALL {
            self.begin_action().await;
            self.execute_fetch(kind, &FilterParams::default()).await;
            self.end_action().await;
        }
        self.persist_quietly().await;

        let total = self.state.read().await.collections.total();
        if discarded {
            info!("Reseeded {} records from {}", total, self.source.name());
            Hydration::Reseeded
        } else {
            info!("Seeded {} records from {}", total, self.source.name());
            Hydration::Seeded
        }
    }

    /// Request a filtered fetch of one kind.
    ///
    /// Requests for the same kind arriving within the debounce window
    /// collapse into one source read using the last request's parameters.
    /// Returns once this request has either executed or been superseded.
    pub async fn fetch(&self, kind: EntityKind, params: FilterParams) {
        self.begin_action().await;
        let ticket = self.coalescer.request(kind, params).await;
        tokio::time::sleep(self.coalescer.window()).await;

        match self.coalescer.claim(kind, ticket).await {
            Some(params) => {
                if self.execute_fetch(kind, &params).await {
                    self.persist_quietly().await;
                }
            }
            None => debug!("{} fetch {} superseded before execution", kind, ticket),
        }
        self.end_action().await;
    }

    /// Execute the pending fetch for `kind` now. Returns whether one was pending.
    pub async fn flush(&self, kind: EntityKind) -> bool {
        let Some(params) = self.coalescer.flush(kind).await else {
            return false;
        };

        self.begin_action().await;
        if self.execute_fetch(kind, &params).await {
            self.persist_quietly().await;
        }
        self.end_action().await;
        true
    }

    /// Drop the pending fetch for `kind`. Returns whether one was pending.
    pub async fn cancel(&self, kind: EntityKind) -> bool {
        self.coalescer.cancel(kind).await
    }

    pub async fn pending_fetch(&self, kind: EntityKind) -> Option<PendingFetch> {
        self.coalescer.pending(kind).await
    }

    /// Read, filter and commit one kind. Returns whether anything was committed.
    async fn execute_fetch(&self, kind: EntityKind, params: &FilterParams) -> bool {
        let run = self.coalescer.begin_run(kind).await;
        debug!("Fetching {} from {} (run {})", kind.label(), self.source.name(), run);

        let result = self.source.fetch(kind).await.and_then(|fetched| {
            let actual = fetched.data.kind();
            if actual == kind {
                Ok(fetched)
            } else {
                Err(SourceError::KindMismatch {
                    expected: kind,
                    actual,
                })
            }
        });

        if !self.coalescer.is_current(kind, run).await {
            debug!("Discarding stale {} result from run {}", kind, run);
            return false;
        }

        let now = self.clock.now();
        let mut state = self.state.write().await;
        match result {
            Ok(fetched) => {
                let mut data = fetched.data;
                state.repository.replace(data.clone());

                let predicate = Predicate::new(params, now);
                predicate.apply(&mut data);
                info!(
                    "Committed {} {} (source latency {:?})",
                    data.len(),
                    kind.label(),
                    fetched.latency
                );
                state.collections.replace(data);
                if predicate.is_unconstrained() {
                    state.filters.remove(&kind);
                } else {
                    state.filters.insert(kind, predicate);
                }
                state.error = None;
                true
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", kind.label(), e);
                state.error = Some(format!("Failed to fetch {}.", kind.label()));
                false
            }
        }
    }

    /// Create a typed record.
    pub async fn create<T: Stored>(&self, record: T) -> MutationOutcome {
        self.create_record(record.into_record()).await
    }

    /// Create a record from a (possibly partial) JSON object.
    pub async fn create_from_json(&self, kind: EntityKind, value: Value) -> MutationOutcome {
        match EntityRecord::from_json(kind, value) {
            Ok(record) => self.create_record(record).await,
            Err(e) => self.mutation_failed("create", kind, SourceError::from(e)).await,
        }
    }

    /// Create a record. It joins the committed slice only if that slice's
    /// active filter would have kept it.
    pub async fn create_record(&self, record: EntityRecord) -> MutationOutcome {
        let kind = record.kind();
        self.begin_action().await;

        let outcome = match self.source.create(record, self.clock.now()).await {
            Ok(created) => {
                let id = created.id().to_string();
                let mut state = self.state.write().await;
                state.repository.upsert(created.clone());
                let visible = state
                    .filters
                    .get(&kind)
                    .map_or(true, |filter| created.accepted_by(filter));
                if visible {
                    state.collections.upsert(created);
                }
                info!("Created {} {} (visible: {})", kind, id, visible);
                MutationOutcome::ok(id)
            }
            Err(e) => self.mutation_failed("create", kind, e).await,
        };

        self.end_action().await;
        if outcome.success {
            self.persist_quietly().await;
        }
        outcome
    }

    /// Merge `patch` into the record `id` of `kind`.
    ///
    /// The committed slice only changes if it currently holds the record.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        patch: &Map<String, Value>,
    ) -> MutationOutcome {
        self.begin_action().await;

        let outcome = match self.source.update(kind, id, patch, self.clock.now()).await {
            Ok(updated) => {
                let mut state = self.state.write().await;
                state.repository.upsert(updated.clone());
                if state.collections.get(kind, id).is_some() {
                    state.collections.upsert(updated);
                }
                info!("Updated {} {}", kind, id);
                MutationOutcome::ok(id)
            }
            Err(e) => self.mutation_failed("update", kind, e).await,
        };

        self.end_action().await;
        if outcome.success {
            self.persist_quietly().await;
        }
        outcome
    }

    /// Delete a record. Deleting a missing id succeeds.
    pub async fn delete(&self, kind: EntityKind, id: &str) -> MutationOutcome {
        self.begin_action().await;

        let outcome = match self.source.delete(kind, id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.repository.remove(kind, id);
                let removed = state.collections.remove(kind, id);
                info!("Deleted {} {} (was committed: {})", kind, id, removed);
                MutationOutcome::ok(id)
            }
            Err(e) => self.mutation_failed("delete", kind, e).await,
        };

        self.end_action().await;
        if outcome.success {
            self.persist_quietly().await;
        }
        outcome
    }

    async fn mutation_failed(&self, action: &str, kind: EntityKind, err: SourceError) -> MutationOutcome {
        let message = format!("Failed to {} {}: {}", action, kind.label(), err);
        error!("{}", message);
        self.state.write().await.error = Some(message.clone());
        MutationOutcome::failed(message)
    }

    /// Compute a report by tag against the committed collections.
    pub async fn analytics(&self, report: &str, params: &FilterParams) -> Result<Report, EngineError> {
        let kind: ReportKind = report.parse()?;
        Ok(self.report(kind, params).await)
    }

    pub async fn report(&self, kind: ReportKind, params: &FilterParams) -> Report {
        let state = self.state.read().await;
        analytics::compute(&state.collections, kind, params, self.clock.now())
    }

    /// Clone out the committed slice of one kind.
    pub async fn collection(&self, kind: EntityKind) -> EntitySet {
        self.state.read().await.collections.set(kind)
    }

    /// Clone out the committed records of one type.
    pub async fn items<T: Stored>(&self) -> Vec<T> {
        T::slice(&self.state.read().await.collections).to_vec()
    }

    pub async fn collections(&self) -> Collections {
        self.state.read().await.collections.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.in_flight > 0
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn view(&self) -> StoreView {
        let state = self.state.read().await;
        let counts = EntityKind::ALL
            .iter()
            .map(|kind| (kind.collection().to_string(), state.collections.count(*kind)))
            .collect();

        StoreView {
            loading: state.in_flight > 0,
            error: state.error.clone(),
            counts,
        }
    }

    /// Show or hide a dashboard widget.
    pub async fn set_widget_visibility(&self, widget: &str, visible: bool) {
        self.state
            .write()
            .await
            .widgets
            .insert(widget.to_string(), visible);
        debug!("Widget {} visible: {}", widget, visible);
        self.persist_quietly().await;
    }

    /// Widgets are visible unless explicitly hidden.
    pub async fn widget_visible(&self, widget: &str) -> bool {
        self.state
            .read()
            .await
            .widgets
            .get(widget)
            .copied()
            .unwrap_or(true)
    }

    pub async fn widgets(&self) -> IndexMap<String, bool> {
        self.state.read().await.widgets.clone()
    }

    /// Capture the persistent part of the store: every unfiltered collection
    /// and the widget preferences.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot::new(
            state.repository.clone(),
            state.widgets.clone(),
            self.clock.now(),
        )
    }

    /// Replace collections and preferences with a snapshot's contents.
    ///
    /// The source is restored first so later fetches and mutations see the
    /// same records. On failure the store is left untouched.
    pub async fn restore(&self, snapshot: StoreSnapshot) -> Result<(), EngineError> {
        self.source.restore(snapshot.collections.clone()).await?;

        let mut state = self.state.write().await;
        state.repository = snapshot.collections.clone();
        state.collections = snapshot.collections;
        state.filters.clear();
        state.widgets = snapshot.widgets;
        Ok(())
    }

    /// Write the snapshot to the attached database, if any.
    pub async fn persist(&self) -> Result<(), EngineError> {
        let Some(database) = &self.database else {
            return Ok(());
        };

        let _guard = self.persist_lock.lock().await;
        let document = self.snapshot().await.to_json()?;
        snapshot::upsert_snapshot(database.pool(), &self.config.storage_key, &document).await?;
        debug!("Persisted snapshot {} ({} bytes)", self.config.storage_key, document.len());
        Ok(())
    }

    async fn persist_quietly(&self) {
        if let Err(e) = self.persist().await {
            warn!("Failed to persist snapshot {}: {}", self.config.storage_key, e);
        }
    }

    async fn begin_action(&self) {
        self.state.write().await.in_flight += 1;
    }

    async fn end_action(&self) {
        let mut state = self.state.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use dealer_core::{Lead, LeadStatus};
    use mock_source::{FaultySource, InMemorySource};
    use serde_json::json;

    use crate::clock::FixedClock;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn source_with_leads() -> InMemorySource {
        let mut collections = Collections::default();
        for (id, status) in [("lead-1", LeadStatus::New), ("lead-2", LeadStatus::Qualified)] {
            collections.leads.push(Lead {
                id: id.to_string(),
                name: format!("Lead {}", id),
                status,
                created_at: at("2024-01-10T00:00:00Z"),
                ..Default::default()
            });
        }
        InMemorySource::new(collections)
    }

    fn store(source: Arc<dyn EntitySource>) -> DealerStore {
        DealerStore::new(source, StoreConfig::default())
            .with_clock(Arc::new(FixedClock::new(at("2024-01-31T00:00:00Z"))))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_commits_filtered_slice() {
        let store = store(Arc::new(source_with_leads()));
        store
            .fetch(EntityKind::Lead, FilterParams::new().with_field("status", "Qualified"))
            .await;

        assert_eq!(store.collection(EntityKind::Lead).await.ids(), vec!["lead-2".to_string()]);
        assert!(!store.is_loading().await);
        assert!(store.error().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_keeps_data() {
        let source = Arc::new(FaultySource::new(source_with_leads()));
        let store = store(source.clone());
        store.fetch(EntityKind::Lead, FilterParams::new()).await;
        assert_eq!(store.collection(EntityKind::Lead).await.len(), 2);

        source.set_failing(true);
        store.fetch(EntityKind::Lead, FilterParams::new()).await;

        assert_eq!(store.error().await.as_deref(), Some("Failed to fetch leads."));
        assert_eq!(store.collection(EntityKind::Lead).await.len(), 2);
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn test_mutation_outcomes() {
        let store = store(Arc::new(source_with_leads()));
        store.hydrate().await;

        let created = store
            .create_from_json(EntityKind::Lead, json!({ "name": "Walk-in", "status": "New" }))
            .await;
        assert!(created.success);
        let id = created.id.unwrap();
        assert_eq!(store.collection(EntityKind::Lead).await.len(), 3);

        let patch = json!({ "status": "Pitched" });
        let updated = store.update(EntityKind::Lead, &id, patch.as_object().unwrap()).await;
        assert!(updated.success);
        let leads: Vec<Lead> = store.items().await;
        assert!(leads.iter().any(|l| l.id == id && l.status == LeadStatus::Pitched));

        let missing = store
            .update(EntityKind::Lead, "nope", patch.as_object().unwrap())
            .await;
        assert!(!missing.success);
        assert!(missing.error.unwrap().starts_with("Failed to update leads"));
        assert!(store.error().await.is_some());

        assert!(store.delete(EntityKind::Lead, &id).await.success);
        assert!(store.delete(EntityKind::Lead, &id).await.success);
        assert_eq!(store.collection(EntityKind::Lead).await.len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_create_commits_nothing() {
        let store = store(Arc::new(source_with_leads()));
        store.hydrate().await;

        let outcome = store
            .create_from_json(EntityKind::Lead, json!({ "estimatedValue": "a lot" }))
            .await;
        assert!(!outcome.success);
        assert!(outcome.id.is_none());
        assert_eq!(store.collection(EntityKind::Lead).await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_stamps_store_clock() {
        let store = store(Arc::new(source_with_leads()));
        store.hydrate().await;

        let id = store
            .create(Lead {
                name: "Walk-in".to_string(),
                ..Default::default()
            })
            .await
            .id
            .unwrap();
        let leads: Vec<Lead> = store.items().await;
        let created = leads.iter().find(|l| l.id == id).unwrap();
        assert_eq!(created.created_at, at("2024-01-31T00:00:00Z"));

        store
            .fetch(EntityKind::Lead, FilterParams::new().with_date_range("this_month"))
            .await;
        assert!(store.collection(EntityKind::Lead).await.ids().contains(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_respects_active_filter() {
        let store = store(Arc::new(source_with_leads()));
        store
            .fetch(EntityKind::Lead, FilterParams::new().with_field("status", "Qualified"))
            .await;

        let hidden = store
            .create_from_json(EntityKind::Lead, json!({ "name": "Cold", "status": "New" }))
            .await;
        let shown = store
            .create_from_json(EntityKind::Lead, json!({ "name": "Warm", "status": "Qualified" }))
            .await;
        assert!(hidden.success && shown.success);

        let ids = store.collection(EntityKind::Lead).await.ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&shown.id.unwrap()));

        // The hidden record still exists and is part of the snapshot.
        let hidden_id = hidden.id.unwrap();
        assert!(!ids.contains(&hidden_id));
        let persisted = store.snapshot().await.collections;
        assert!(persisted.leads.iter().any(|l| l.id == hidden_id));
        assert_eq!(persisted.leads.len(), 4);

        // An unfiltered fetch clears the filter.
        store.fetch(EntityKind::Lead, FilterParams::new()).await;
        let walk_in = store
            .create_from_json(EntityKind::Lead, json!({ "name": "Walk-in", "status": "New" }))
            .await;
        assert!(store
            .collection(EntityKind::Lead)
            .await
            .ids()
            .contains(&walk_in.id.unwrap()));
    }

    #[tokio::test]
    async fn test_widgets_default_visible() {
        let store = store(Arc::new(InMemorySource::default()));
        assert!(store.widget_visible("revenue-chart").await);

        store.set_widget_visibility("revenue-chart", false).await;
        assert!(!store.widget_visible("revenue-chart").await);
        assert_eq!(store.snapshot().await.widgets.get("revenue-chart"), Some(&false));
    }

    #[tokio::test]
    async fn test_view_counts_every_collection() {
        let store = store(Arc::new(source_with_leads()));
        store.hydrate().await;

        let view = store.view().await;
        assert!(!view.loading);
        assert_eq!(view.counts.len(), EntityKind::ALL.len());
        assert_eq!(view.counts["leads"], 2);
        assert_eq!(view.counts["salesOrders"], 0);
    }

    #[tokio::test]
    async fn test_unknown_report() {
        let store = store(Arc::new(InMemorySource::default()));
        let result = store.analytics("weather", &FilterParams::new()).await;
        assert!(matches!(result, Err(EngineError::UnknownReport(_))));
    }
}
