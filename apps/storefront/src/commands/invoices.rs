//! # Invoice Commands
//!
//! Read-only access to the invoice history.

use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use tcb_core::Invoice;

pub async fn list_invoices(db: &DbState) -> Result<Vec<Invoice>, ApiError> {
    debug!("list_invoices command");
    Ok(db.inner().invoices().list().await?)
}

/// Exact invoice number, e.g. `TCB-1700000000000`.
pub async fn get_invoice(db: &DbState, invoice_number: String) -> Result<Invoice, ApiError> {
    debug!(%invoice_number, "get_invoice command");
    db.inner()
        .invoices()
        .get(invoice_number.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice", &invoice_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{place_pickup_order, storefront};

    #[tokio::test]
    async fn test_invoice_lookup() {
        let (sf, _) = storefront().await;
        let sale = place_pickup_order(&sf).await;

        let invoice = get_invoice(&sf.db, format!(" {} ", sale.invoice_number))
            .await
            .unwrap();
        assert_eq!(invoice.total, sale.total);
        assert_eq!(list_invoices(&sf.db).await.unwrap().len(), 1);

        let err = get_invoice(&sf.db, "TCB-0".to_string()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
