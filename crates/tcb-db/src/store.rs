//! # Key-Value Store
//!
//! The storefront persists every collection as one JSON value under a
//! well-known key, the same layout the browser shell keeps in its local
//! storage. Here those keys live in the `kv_store` SQLite table.
//!
//! ## Write Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Read-Modify-Write                                    │
//! │                                                                         │
//! │  repository                                                             │
//! │       │  let _guard = store.lock().await;   ← one writer at a time      │
//! │       ▼                                                                 │
//! │  get("sales") ──► decode ──► transform ──► encode                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_batch([set sales, set invoices, ...])  ← one SQLite transaction  │
//! │                                                                         │
//! │  Readers never observe half of a batch.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is in-process only. Two processes writing the same database
//! race with last-write-wins on the whole key.

use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Persisted key names.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const PROMOTIONS: &str = "promotions";
    pub const SALES: &str = "sales";
    pub const INVOICES: &str = "invoices";
    pub const NOTIFICATIONS: &str = "adminNotifications";
    /// Decimal string, not JSON.
    pub const CASH_BASE: &str = "cashBase";
    /// Raw URI or data URI, not JSON.
    pub const BACKGROUND_IMAGE: &str = "backgroundImage";
    /// Customer profile draft between the order-type form and checkout.
    pub const ORDER_DATA: &str = "orderData";
    /// Hand-off bundle for the confirmation-pending screen.
    pub const PENDING_ORDER: &str = "pendingOrder";
}

// =============================================================================
// Write Batch
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

/// A group of writes committed together.
///
/// ## Example
/// ```rust,ignore
/// let batch = WriteBatch::new()
///     .set(keys::SALES, sales_json)
///     .set(keys::INVOICES, invoices_json);
/// store.write_batch(batch).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Remove { key: key.into() });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the `kv_store` table.
///
/// Cheap to clone; clones share the pool and the write lock.
#[derive(Debug, Clone)]
pub struct KvStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        KvStore {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Serialises read-modify-write sequences within this process.
    ///
    /// Hold the guard from the first read to the final write.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Reads the raw value under a key.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Writes one key.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, bytes = value.len(), "Writing key");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes one key. Removing a missing key is not an error.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        debug!(key, "Removing key");

        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Applies every write in the batch in one transaction.
    ///
    /// ## When This Fails
    /// Any failing statement rolls the whole batch back
    /// (`DbError::TransactionFailed`); no key of the batch changes.
    pub async fn write_batch(&self, batch: WriteBatch) -> DbResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!(writes = batch.len(), "Committing write batch");

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for op in batch.ops {
            let result = match op {
                WriteOp::Set { key, value } => {
                    sqlx::query(
                        r#"
                        INSERT INTO kv_store (key, value, updated_at)
                        VALUES (?1, ?2, ?3)
                        ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at
                        "#,
                    )
                    .bind(key)
                    .bind(value)
                    .bind(now)
                    .execute(&mut *tx)
                    .await
                }
                WriteOp::Remove { key } => {
                    sqlx::query("DELETE FROM kv_store WHERE key = ?1")
                        .bind(key)
                        .execute(&mut *tx)
                        .await
                }
            };

            // dropping `tx` without commit rolls back
            result.map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Keys currently stored, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn store() -> KvStore {
        Database::new(DbConfig::in_memory()).await.unwrap().store()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = store().await;

        assert_eq!(store.get(keys::CASH_BASE).await.unwrap(), None);

        store.set(keys::CASH_BASE, "50000").await.unwrap();
        store.set(keys::CASH_BASE, "75000").await.unwrap();
        assert_eq!(
            store.get(keys::CASH_BASE).await.unwrap().as_deref(),
            Some("75000")
        );

        store.remove(keys::CASH_BASE).await.unwrap();
        store.remove(keys::CASH_BASE).await.unwrap();
        assert_eq!(store.get(keys::CASH_BASE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_batch_applies_all() {
        let store = store().await;
        store.set(keys::ORDER_DATA, "{}").await.unwrap();

        let batch = WriteBatch::new()
            .set(keys::SALES, "[1]")
            .set(keys::INVOICES, "[2]")
            .remove(keys::ORDER_DATA);
        store.write_batch(batch).await.unwrap();

        assert_eq!(
            store.keys().await.unwrap(),
            vec!["invoices".to_string(), "sales".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let store = store().await;
        store.write_batch(WriteBatch::new()).await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }
}
