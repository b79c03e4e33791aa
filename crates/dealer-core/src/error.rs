//! Error types for data source operations.

use thiserror::Error;

use crate::kind::EntityKind;

/// Errors that can occur when reading or mutating a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No record with this id exists.
    #[error("{kind} record not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The patch or record could not be applied to the entity type.
    #[error("invalid record: {0}")]
    InvalidPatch(String),

    /// The source is temporarily unavailable.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source returned a carrier of the wrong kind.
    #[error("expected {expected} data, got {actual}")]
    KindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPatch(err.to_string())
    }
}

/// Errors that can occur while decoding a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid JSON for the snapshot layout.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The document was written by an incompatible layout version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
