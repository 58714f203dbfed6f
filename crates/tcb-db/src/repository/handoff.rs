//! # Checkout Hand-off Repository
//!
//! Short-lived records passed between screens of the ordering flow.
//!
//! ```text
//! order-type form ──► orderData ──► checkout ──► pendingOrder ──► confirmation screen
//!                     (profile)                  (invoice + profile + method)
//! ```
//!
//! Both records are single JSON objects. A value that fails to parse reads
//! as absent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::store::{keys, KvStore};
use tcb_core::{CustomerProfile, PendingOrder};

#[derive(Debug, Clone)]
pub struct HandoffRepository {
    store: KvStore,
}

impl HandoffRepository {
    pub fn new(store: KvStore) -> Self {
        HandoffRepository { store }
    }

    /// Stores the customer profile draft from the order-type form.
    pub async fn save_order_data(&self, profile: &CustomerProfile) -> DbResult<()> {
        self.put(keys::ORDER_DATA, profile).await
    }

    pub async fn order_data(&self) -> DbResult<Option<CustomerProfile>> {
        self.read(keys::ORDER_DATA).await
    }

    pub async fn clear_order_data(&self) -> DbResult<()> {
        self.store.remove(keys::ORDER_DATA).await
    }

    /// Stores the bundle shown on the confirmation-pending screen.
    pub async fn save_pending_order(&self, pending: &PendingOrder) -> DbResult<()> {
        self.put(keys::PENDING_ORDER, pending).await
    }

    pub async fn pending_order(&self) -> DbResult<Option<PendingOrder>> {
        self.read(keys::PENDING_ORDER).await
    }

    /// Reads and removes the pending-order bundle.
    pub async fn take_pending_order(&self) -> DbResult<Option<PendingOrder>> {
        let _guard = self.store.lock().await;
        let pending = self.read(keys::PENDING_ORDER).await?;
        self.store.remove(keys::PENDING_ORDER).await?;
        Ok(pending)
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        debug!(key, "Saving hand-off record");
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json).await
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Stored hand-off record is corrupt, treating as absent");
                Ok(None)
            }
        }
    }
}
