//! Error types for engine operations.

use database::DatabaseError;
use dealer_core::{SnapshotError, SourceError};
use thiserror::Error;

/// Errors that can occur in the engine.
///
/// Store actions do not return these for ordinary data failures: fetch
/// failures surface through the store's error message and mutation failures
/// through [`MutationOutcome`](crate::MutationOutcome).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The data source failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Snapshot storage failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// No report exists with this tag.
    #[error("unknown report: {0}")]
    UnknownReport(String),

    /// No entity collection exists with this name.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// The parameter bag was not a JSON object.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<dealer_core::UnknownKind> for EngineError {
    fn from(err: dealer_core::UnknownKind) -> Self {
        Self::UnknownCollection(err.0)
    }
}
