//! Application state shared across handlers.

use std::sync::Arc;

use dealer_engine::DealerStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The entity store.
    pub store: Arc<DealerStore>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: DealerStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
