//! # Invoice Repository
//!
//! Read-only access to the invoice history. Invoices are appended by
//! [`OrderRepository::record`](super::order::OrderRepository::record) and
//! erased only by a history clear; nothing edits them.

use crate::collection::Collection;
use crate::error::DbResult;
use crate::store::{keys, KvStore};
use tcb_core::Invoice;

pub(crate) const INVOICES: Collection<Invoice> = Collection::new(keys::INVOICES);

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    store: KvStore,
}

impl InvoiceRepository {
    pub fn new(store: KvStore) -> Self {
        InvoiceRepository { store }
    }

    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        INVOICES.load(&self.store).await
    }

    /// Exact match on the invoice number.
    pub async fn get(&self, invoice_number: &str) -> DbResult<Option<Invoice>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|i| i.invoice_number == invoice_number))
    }
}
