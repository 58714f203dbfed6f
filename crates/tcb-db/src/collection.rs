//! # Typed Collections
//!
//! A [`Collection`] is a JSON array of records under one store key.
//!
//! ## Corruption Policy
//! ```text
//! stored value          load() result
//! ────────────          ─────────────
//! (missing)        ──►  []
//! "[{...}, {...}]" ──►  [T, T]
//! "not json"       ──►  []   + warn!
//! "[{\"id\": ...   ──►  []   + warn!   (truncated)
//! ```
//! A store that fails to parse behaves as freshly empty; the next save
//! overwrites it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::warn;

use crate::error::DbResult;
use crate::store::{KvStore, WriteBatch};

/// Typed view of the JSON array stored under `key`.
#[derive(Debug)]
pub struct Collection<T> {
    key: &'static str,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Collection<T> {}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub const fn new(key: &'static str) -> Self {
        Collection {
            key,
            _records: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Loads every record; missing or corrupt values load as empty.
    pub async fn load(&self, store: &KvStore) -> DbResult<Vec<T>> {
        let raw = store.get(self.key).await?;
        Ok(raw.map(|raw| self.decode(&raw)).unwrap_or_default())
    }

    /// Parses a stored value, treating parse failures as empty.
    pub fn decode(&self, raw: &str) -> Vec<T> {
        match serde_json::from_str(raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(key = self.key, error = %e, "Stored collection is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn encode(&self, records: &[T]) -> DbResult<String> {
        Ok(serde_json::to_string(records)?)
    }

    /// Replaces the whole collection.
    pub async fn save(&self, store: &KvStore, records: &[T]) -> DbResult<()> {
        store.set(self.key, &self.encode(records)?).await
    }

    /// Adds a replace-whole-collection write to a batch.
    pub fn stage(&self, batch: WriteBatch, records: &[T]) -> DbResult<WriteBatch> {
        Ok(batch.set(self.key, self.encode(records)?))
    }
}
