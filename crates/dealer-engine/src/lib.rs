//! Entity store and analytics engine for dealership dashboards.
//!
//! This crate provides the [`DealerStore`] type, the single state container
//! behind every dashboard and list view. It holds one committed collection per
//! entity kind and exposes the whole action surface UI layers consume.
//!
//! # Features
//!
//! - Filtered fetches by date range, free-text search and exact field match
//! - Per-kind debounce so bursts of fetches collapse into one source read
//! - Last-write-wins: results of superseded runs are discarded
//! - Create, update and delete with `{success, id, error}` outcomes
//! - KPI and chart-series reports over one or more collections
//! - Best-effort snapshot persistence through the `database` crate
//!
//! # Architecture
//!
//! ```text
//! fetch(kind, params)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DEALER STORE                          │
//! │                                                             │
//! │  1. FetchCoalescer: wait out the window, last call wins     │
//! │         ↓                                                   │
//! │  2. EntitySource: read the raw collection                   │
//! │         ↓                                                   │
//! │  3. Predicate: date range ∧ search ∧ field filters          │
//! │         ↓                                                   │
//! │  4. Commit the slice, clear loading, persist snapshot       │
//! └─────────────────────────────────────────────────────────────┘
//!
//! analytics(report, params) → reads committed collections → Report
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dealer_engine::{DealerStore, FilterParams, StoreConfig};
//! use dealer_core::EntityKind;
//! use mock_source::InMemorySource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(InMemorySource::seeded(42, chrono::Utc::now()));
//!     let store = DealerStore::new(source, StoreConfig::default());
//!     store.hydrate().await;
//!
//!     let params = FilterParams::new()
//!         .with_date_range("this_month")
//!         .with_field("status", "New");
//!     store.fetch(EntityKind::Lead, params).await;
//!
//!     let report = store.analytics("leads", &FilterParams::new()).await?;
//!     println!("{:?}", report.series("statusBreakdown"));
//!     Ok(())
//! }
//! ```

pub mod analytics;
mod clock;
mod coalescer;
mod config;
mod error;
mod params;
mod predicate;
mod range;
mod store;

pub use analytics::{Report, ReportKind, SeriesPoint};
pub use clock::{Clock, FixedClock, SystemClock};
pub use coalescer::{FetchCoalescer, PendingFetch};
pub use config::{EngineConfig, StoreConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_STORAGE_KEY};
pub use error::EngineError;
pub use params::FilterParams;
pub use predicate::{Predicate, UNASSIGNED};
pub use range::{DateRange, Interval};
pub use store::{DealerStore, Hydration, MutationOutcome, StoreView};
