//! # Order Status Lookup
//!
//! The public "where is my order" page. The customer types an invoice
//! number, a phone number or an order id.
//!
//! ```text
//! "tcb-1700"      ─► invoice number contains (any case)
//! "3001234567"    ─► phone contains
//! "1700000000000" ─► exact order id
//! ```
//!
//! The first stored order that matches wins. No match is `Ok(None)`.

use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use tcb_core::{OrderQuery, Sale};

pub async fn lookup_order(db: &DbState, query: String) -> Result<Option<Sale>, ApiError> {
    debug!(%query, "lookup_order command");
    let query = OrderQuery::parse(&query)?;
    Ok(db.inner().orders().find(&query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{place_pickup_order, storefront};

    #[tokio::test]
    async fn test_lookup_by_any_key() {
        let (sf, _) = storefront().await;
        let sale = place_pickup_order(&sf).await;

        let by_invoice = lookup_order(&sf.db, sale.invoice_number.to_lowercase())
            .await
            .unwrap();
        assert_eq!(by_invoice.map(|s| s.id), Some(sale.id));

        let by_phone = lookup_order(&sf.db, "1234567".to_string()).await.unwrap();
        assert_eq!(by_phone.map(|s| s.id), Some(sale.id));

        let by_id = lookup_order(&sf.db, sale.id.to_string()).await.unwrap();
        assert_eq!(by_id.map(|s| s.id), Some(sale.id));

        assert!(lookup_order(&sf.db, "XYZ-9".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let (sf, _) = storefront().await;
        let err = lookup_order(&sf.db, "   ".to_string()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
