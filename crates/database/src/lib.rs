//! SQLite snapshot storage for the dealer entity store.
//!
//! This crate provides async key-value operations for persisted store
//! documents using SQLx with SQLite. Each document lives under a fixed
//! storage key and is replaced wholesale on every write.
//!
//! # Example
//!
//! ```no_run
//! use database::{snapshot, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:dealer.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     snapshot::upsert_snapshot(db.pool(), "dealer-store", r#"{"version":1}"#).await?;
//!     let record = snapshot::get_snapshot(db.pool(), "dealer-store").await?;
//!     assert!(record.is_some());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod snapshot;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::SnapshotRecord;
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/dealer.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing; use a single connection)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Connect to a private in-memory database and run migrations.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_crud() {
        let db = Database::in_memory().await.unwrap();
        let pool = db.pool();

        // Missing
        assert!(snapshot::get_snapshot(pool, "dealer-store").await.unwrap().is_none());

        // Create
        snapshot::upsert_snapshot(pool, "dealer-store", "{\"a\":1}").await.unwrap();
        let fetched = snapshot::get_snapshot(pool, "dealer-store").await.unwrap().unwrap();
        assert_eq!(fetched.document, "{\"a\":1}");

        // Replace
        snapshot::upsert_snapshot(pool, "dealer-store", "{\"a\":2}").await.unwrap();
        let fetched = snapshot::get_snapshot(pool, "dealer-store").await.unwrap().unwrap();
        assert_eq!(fetched.document, "{\"a\":2}");
        assert_eq!(snapshot::list_keys(pool).await.unwrap(), vec!["dealer-store"]);

        // Delete
        snapshot::clear_snapshot(pool, "dealer-store").await.unwrap();
        let result = snapshot::clear_snapshot(pool, "dealer-store").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_rejects_invalid_key() {
        let db = Database::in_memory().await.unwrap();
        let result = snapshot::upsert_snapshot(db.pool(), "", "{}").await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
