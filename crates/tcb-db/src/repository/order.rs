//! # Order Repository
//!
//! Persists order intake and drives the order lifecycle over the stored
//! `sales` collection.
//!
//! ## Intake Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(draft, prefix, now)                                             │
//! │       │                                                                 │
//! │       │  lock                                                           │
//! │       ▼                                                                 │
//! │  load sales, invoices, adminNotifications                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderIdentity::allocate()  ← no collision with stored records          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.place() ──► Sale + Invoice + Notification                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ONE write batch: sales, invoices, adminNotifications                   │
//! │  (an Invoice without its Sale is never observable)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::invoice::INVOICES;
use super::notification::NOTIFICATIONS;
use crate::collection::Collection;
use crate::error::DbResult;
use crate::store::{keys, KvStore, WriteBatch};
use tcb_core::query::orders_of_type;
use tcb_core::{
    CoreError, OrderAction, OrderDraft, OrderIdentity, OrderQuery, OrderType, PlacedOrder, Sale,
    SaleRevision,
};

pub(crate) const SALES: Collection<Sale> = Collection::new(keys::SALES);

/// Repository for placed orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    store: KvStore,
}

impl OrderRepository {
    pub fn new(store: KvStore) -> Self {
        OrderRepository { store }
    }

    /// Persists a prepared order as Sale, Invoice and Notification at once.
    ///
    /// ## Arguments
    /// * `draft` - Validated order from `OrderDraft::prepare`
    /// * `prefix` - Invoice number prefix (e.g. `TCB`)
    /// * `now` - Intake instant; ids and the invoice number derive from it
    pub async fn record(
        &self,
        draft: OrderDraft,
        prefix: &str,
        now: DateTime<Utc>,
    ) -> DbResult<PlacedOrder> {
        let _guard = self.store.lock().await;

        let mut sales = SALES.load(&self.store).await?;
        let mut invoices = INVOICES.load(&self.store).await?;
        let mut notifications = NOTIFICATIONS.load(&self.store).await?;

        let identity = OrderIdentity::allocate(prefix, now, &sales, &invoices, &notifications);
        let placed = draft.place(identity, now);

        sales.push(placed.sale.clone());
        invoices.push(placed.invoice.clone());
        notifications.push(placed.notification.clone());

        let batch = SALES.stage(WriteBatch::new(), &sales)?;
        let batch = INVOICES.stage(batch, &invoices)?;
        let batch = NOTIFICATIONS.stage(batch, &notifications)?;
        self.store.write_batch(batch).await?;

        info!(
            sale_id = placed.sale.id,
            invoice_number = %placed.sale.invoice_number,
            total = %placed.sale.total,
            order_type = placed.sale.order_type.display_name(),
            "Order recorded"
        );

        Ok(placed)
    }

    /// Every sale, in stored (intake) order.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        SALES.load(&self.store).await
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Sale>> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }

    /// Public order-status lookup: first match in stored order.
    pub async fn find(&self, query: &OrderQuery) -> DbResult<Option<Sale>> {
        let sales = self.list().await?;
        Ok(query.find(&sales).cloned())
    }

    /// Sales of one order type (orders board tabs).
    pub async fn of_type(&self, order_type: OrderType) -> DbResult<Vec<Sale>> {
        let sales = self.list().await?;
        Ok(orders_of_type(&sales, order_type).into_iter().cloned().collect())
    }

    /// Applies a status transition and rewrites the collection.
    ///
    /// ## When This Fails
    /// - `OrderNotFound` when no sale has this id
    /// - `InvalidTransition` when the action has no edge from the current
    ///   status; nothing is written
    pub async fn advance(&self, id: i64, action: OrderAction) -> DbResult<Sale> {
        self.modify(id, |sale| {
            let from = sale.status;
            let to = sale.advance(action)?;
            info!(sale_id = id, %from, %to, %action, "Order status changed");
            Ok(())
        })
        .await
    }

    /// Applies an admin edit; totals are recomputed with the stored
    /// delivery fee. Status and invoice number are unchanged.
    pub async fn revise(&self, id: i64, revision: SaleRevision) -> DbResult<Sale> {
        self.modify(id, |sale| {
            sale.revise(revision)?;
            info!(sale_id = id, total = %sale.total, "Order edited");
            Ok(())
        })
        .await
    }

    /// Removes one sale. Its invoice stays in the invoice history.
    pub async fn delete(&self, id: i64) -> DbResult<Sale> {
        let _guard = self.store.lock().await;
        let mut sales = SALES.load(&self.store).await?;

        let index = sales
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;
        let removed = sales.remove(index);

        SALES.save(&self.store, &sales).await?;
        info!(sale_id = id, invoice_number = %removed.invoice_number, "Order deleted");
        Ok(removed)
    }

    /// Erases all sales, invoices and notifications in one transaction.
    ///
    /// Returns the number of sales that were removed.
    pub async fn clear_history(&self) -> DbResult<usize> {
        let _guard = self.store.lock().await;
        let removed = SALES.load(&self.store).await?.len();

        let batch = WriteBatch::new()
            .remove(keys::SALES)
            .remove(keys::INVOICES)
            .remove(keys::NOTIFICATIONS);
        self.store.write_batch(batch).await?;

        info!(sales = removed, "Order history cleared");
        Ok(removed)
    }

    /// Locked read-modify-write of one sale. Nothing is written when
    /// `change` fails.
    async fn modify(
        &self,
        id: i64,
        change: impl FnOnce(&mut Sale) -> Result<(), CoreError>,
    ) -> DbResult<Sale> {
        let _guard = self.store.lock().await;
        let mut sales = SALES.load(&self.store).await?;

        let sale = sales
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;
        change(sale)?;
        let updated = sale.clone();

        debug!(sale_id = id, "Rewriting sales collection");
        SALES.save(&self.store, &sales).await?;
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
