//! The persisted store document.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::collections::Collections;
use crate::error::SnapshotError;

/// Layout version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the store persists across restarts.
///
/// Volatile state (loading, error) is never part of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub collections: Collections,
    /// Dashboard widget visibility keyed by widget id.
    #[serde(default)]
    pub widgets: IndexMap<String, bool>,
}

impl StoreSnapshot {
    pub fn new(collections: Collections, widgets: IndexMap<String, bool>, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at,
            collections,
            widgets,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a snapshot, rejecting documents from other layout versions.
    pub fn from_json(document: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(document)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Customer, Lead, Payment};

    #[test]
    fn test_round_trip_preserves_collections() {
        let mut collections = Collections::default();
        collections.leads.push(Lead {
            id: "lead-1".to_string(),
            assigned_to: Some("user-1".to_string()),
            estimated_value: 42_000.0,
            ..Default::default()
        });
        collections.customers.push(Customer {
            id: "cust-1".to_string(),
            total_spent: 12.5,
            ..Default::default()
        });
        collections.payments.push(Payment {
            id: "pay-1".to_string(),
            date: None,
            ..Default::default()
        });

        let mut widgets = IndexMap::new();
        widgets.insert("revenue-chart".to_string(), false);

        let snapshot = StoreSnapshot::new(collections, widgets, Utc::now());
        let restored = StoreSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();

        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            StoreSnapshot::from_json("{not json"),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_other_versions() {
        let document = r#"{"version":99,"savedAt":"2024-01-01T00:00:00Z","collections":{}}"#;
        assert!(matches!(
            StoreSnapshot::from_json(document),
            Err(SnapshotError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
