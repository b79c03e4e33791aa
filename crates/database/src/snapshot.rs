//! Key-value snapshot storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::SnapshotRecord;
use crate::validation::validate_storage_key;

/// Create or replace the document stored under a key.
pub async fn upsert_snapshot(pool: &SqlitePool, storage_key: &str, document: &str) -> Result<()> {
    validate_storage_key(storage_key)?;

    sqlx::query(
        r#"
        INSERT INTO snapshots (storage_key, document)
        VALUES (?, ?)
        ON CONFLICT(storage_key) DO UPDATE SET
            document = excluded.document,
            updated_at = datetime('now')
        "#,
    )
    .bind(storage_key)
    .bind(document)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the document stored under a key, if any.
pub async fn get_snapshot(pool: &SqlitePool, storage_key: &str) -> Result<Option<SnapshotRecord>> {
    let record = sqlx::query_as::<_, SnapshotRecord>(
        r#"
        SELECT storage_key, document, updated_at
        FROM snapshots
        WHERE storage_key = ?
        "#,
    )
    .bind(storage_key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Delete the document stored under a key.
pub async fn clear_snapshot(pool: &SqlitePool, storage_key: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM snapshots
        WHERE storage_key = ?
        "#,
    )
    .bind(storage_key)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Snapshot",
            id: storage_key.to_string(),
        });
    }

    Ok(())
}

/// List every storage key with a stored document.
pub async fn list_keys(pool: &SqlitePool) -> Result<Vec<String>> {
    let keys = sqlx::query_scalar::<_, String>(
        r#"
        SELECT storage_key FROM snapshots
        ORDER BY storage_key
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(keys)
}
