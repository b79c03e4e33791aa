//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted store document under a fixed storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SnapshotRecord {
    /// Storage key (e.g., "dealer-store").
    pub storage_key: String,
    /// Serialized JSON document.
    pub document: String,
    /// Last write timestamp.
    pub updated_at: String,
}
