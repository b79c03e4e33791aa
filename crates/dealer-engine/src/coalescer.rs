//! Per-kind debounce for fetch requests.
//!
//! Each request records itself as the pending fetch for its kind and waits
//! out the window. When the window ends only the request still holding the
//! latest ticket claims the pending fetch; earlier requests in the burst find
//! a newer ticket and return without reading the source. Runs carry a
//! sequence number so a result that resolves after a newer run started for
//! the same kind can be recognised as stale.
//!
//! The lock guards bookkeeping only and is never held across a source call,
//! so requests for different kinds never wait on each other.

use std::collections::HashMap;
use std::time::Duration;

use dealer_core::EntityKind;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::params::FilterParams;

/// The fetch waiting out the window for one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub ticket: u64,
    pub params: FilterParams,
    pub requested_at: Instant,
}

#[derive(Debug, Default)]
struct CoalescerState {
    next_ticket: u64,
    pending: HashMap<EntityKind, PendingFetch>,
    next_run: u64,
    latest_run: HashMap<EntityKind, u64>,
}

/// Collapses bursts of fetches for one kind into a single execution.
#[derive(Debug)]
pub struct FetchCoalescer {
    window: Duration,
    state: Mutex<CoalescerState>,
}

impl FetchCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: Mutex::new(CoalescerState::default()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Register a request, superseding any pending one for the same kind.
    /// Returns the ticket to present to [`claim`](Self::claim).
    pub async fn request(&self, kind: EntityKind, params: FilterParams) -> u64 {
        let mut state = self.state.lock().await;
        state.next_ticket += 1;
        let ticket = state.next_ticket;

        let pending = PendingFetch {
            ticket,
            params,
            requested_at: Instant::now(),
        };
        if let Some(previous) = state.pending.insert(kind, pending) {
            debug!(
                "Coalesced {} fetch: ticket {} superseded by {}",
                kind, previous.ticket, ticket
            );
        }
        ticket
    }

    /// Take the pending parameters if `ticket` is still the latest request.
    pub async fn claim(&self, kind: EntityKind, ticket: u64) -> Option<FilterParams> {
        let mut state = self.state.lock().await;
        match state.pending.get(&kind) {
            Some(pending) if pending.ticket == ticket => {
                state.pending.remove(&kind).map(|pending| pending.params)
            }
            _ => None,
        }
    }

    /// Take the pending parameters immediately, regardless of the window.
    pub async fn flush(&self, kind: EntityKind) -> Option<FilterParams> {
        let mut state = self.state.lock().await;
        state.pending.remove(&kind).map(|pending| pending.params)
    }

    /// Drop the pending request. Returns whether one existed.
    pub async fn cancel(&self, kind: EntityKind) -> bool {
        let mut state = self.state.lock().await;
        let cancelled = state.pending.remove(&kind).is_some();
        if cancelled {
            debug!("Cancelled pending {} fetch", kind);
        }
        cancelled
    }

    pub async fn pending(&self, kind: EntityKind) -> Option<PendingFetch> {
        self.state.lock().await.pending.get(&kind).cloned()
    }

    /// Start a run for `kind`, making every earlier run for it stale.
    pub async fn begin_run(&self, kind: EntityKind) -> u64 {
        let mut state = self.state.lock().await;
        state.next_run += 1;
        let run = state.next_run;
        state.latest_run.insert(kind, run);
        run
    }

    /// Whether `run` is still the newest run for `kind`.
    pub async fn is_current(&self, kind: EntityKind, run: u64) -> bool {
        self.state.lock().await.latest_run.get(&kind) == Some(&run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_latest_ticket_claims() {
        let coalescer = FetchCoalescer::new(Duration::from_millis(300));
        let first = coalescer
            .request(EntityKind::Lead, FilterParams::new().with_search("a"))
            .await;
        let second = coalescer
            .request(EntityKind::Lead, FilterParams::new().with_search("b"))
            .await;

        assert_eq!(coalescer.claim(EntityKind::Lead, first).await, None);
        let claimed = coalescer.claim(EntityKind::Lead, second).await.unwrap();
        assert_eq!(claimed.search.as_deref(), Some("b"));
        assert!(coalescer.pending(EntityKind::Lead).await.is_none());
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let coalescer = FetchCoalescer::new(Duration::from_millis(300));
        let lead = coalescer.request(EntityKind::Lead, FilterParams::new()).await;
        let task = coalescer.request(EntityKind::Task, FilterParams::new()).await;

        assert!(coalescer.claim(EntityKind::Lead, lead).await.is_some());
        assert!(coalescer.claim(EntityKind::Task, task).await.is_some());
    }

    #[tokio::test]
    async fn test_flush_and_cancel() {
        let coalescer = FetchCoalescer::new(Duration::from_millis(300));
        let ticket = coalescer
            .request(EntityKind::Invoice, FilterParams::new().with_field("status", "Paid"))
            .await;

        let pending = coalescer.pending(EntityKind::Invoice).await.unwrap();
        assert_eq!(pending.ticket, ticket);

        assert!(coalescer.flush(EntityKind::Invoice).await.is_some());
        assert!(coalescer.claim(EntityKind::Invoice, ticket).await.is_none());

        coalescer.request(EntityKind::Invoice, FilterParams::new()).await;
        assert!(coalescer.cancel(EntityKind::Invoice).await);
        assert!(!coalescer.cancel(EntityKind::Invoice).await);
        assert!(coalescer.flush(EntityKind::Invoice).await.is_none());
    }

    #[tokio::test]
    async fn test_newer_run_makes_older_stale() {
        let coalescer = FetchCoalescer::new(Duration::ZERO);
        let old = coalescer.begin_run(EntityKind::Product).await;
        let other_kind = coalescer.begin_run(EntityKind::Customer).await;
        assert!(coalescer.is_current(EntityKind::Product, old).await);

        let new = coalescer.begin_run(EntityKind::Product).await;
        assert!(!coalescer.is_current(EntityKind::Product, old).await);
        assert!(coalescer.is_current(EntityKind::Product, new).await);
        assert!(coalescer.is_current(EntityKind::Customer, other_kind).await);
    }
}
