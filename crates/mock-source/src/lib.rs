//! In-memory data sources for the dealer entity store.
//!
//! This crate provides implementations of the `EntitySource` trait:
//! - `InMemorySource` - Canonical collections held in process memory,
//!   optionally seeded with synthetic dealership data
//! - `DelayedSource` - Wraps another source with artificial latency
//! - `FaultySource` - Wraps another source with switchable failures
//! - `RecordingSource` - Wraps another source and records fetches
//!
//! A remote backend implements the same trait and replaces these without
//! touching the engine.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use mock_source::{EntityKind, EntitySource, InMemorySource};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), mock_source::SourceError> {
//!     let source = InMemorySource::seeded(42, Utc::now());
//!     let fetched = source.fetch(EntityKind::Lead).await?;
//!     println!("{} leads", fetched.data.len());
//!     Ok(())
//! }
//! ```

mod delayed;
mod faulty;
mod memory;
mod recording;
mod seed;

// Re-export dealer-core types for convenience
pub use dealer_core::{EntityKind, EntityRecord, EntitySet, EntitySource, Fetched, SourceError};

pub use delayed::DelayedSource;
pub use faulty::FaultySource;
pub use memory::InMemorySource;
pub use recording::RecordingSource;
pub use seed::{SeedSizes, Seeder};
