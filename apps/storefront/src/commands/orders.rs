//! # Order Commands
//!
//! The admin side of the order lifecycle.
//!
//! ## Status Buttons
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──confirm_payment──► preparing ──mark_ready──► ready          │
//! │      │                            ▲                        │            │
//! │      └──────prepare_order─────────┘                  complete_order     │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                                                        completed        │
//! │                                                                         │
//! │  confirm_payment also sends the confirmed invoice to the customer.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `delete_order` and `clear_history` refuse to run unless the caller
//! passes `confirmed = true`.

use chrono::Local;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::messenger::Messenger;
use crate::state::{ConfigState, DbState};
use tcb_core::messaging::{chat_link, render_invoice, InvoiceNotice};
use tcb_core::{CoreError, OrderAction, OrderType, Sale, SaleRevision};

/// Every order, oldest first.
pub async fn list_orders(db: &DbState) -> Result<Vec<Sale>, ApiError> {
    debug!("list_orders command");
    Ok(db.inner().orders().list().await?)
}

/// Orders of one fulfilment kind (the admin tabs).
pub async fn orders_by_type(db: &DbState, order_type: OrderType) -> Result<Vec<Sale>, ApiError> {
    debug!(?order_type, "orders_by_type command");
    Ok(db.inner().orders().of_type(order_type).await?)
}

pub async fn get_order(db: &DbState, id: i64) -> Result<Sale, ApiError> {
    debug!(id, "get_order command");
    let sale = db
        .inner()
        .orders()
        .get(id)
        .await?
        .ok_or(CoreError::OrderNotFound(id.to_string()))?;
    Ok(sale)
}

/// pending → preparing, then the confirmed invoice goes to the customer.
pub async fn confirm_payment(
    db: &DbState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    id: i64,
) -> Result<Sale, ApiError> {
    debug!(id, "confirm_payment command");
    apply(db, config, messenger, id, OrderAction::ConfirmPayment).await
}

/// pending → preparing without sending anything.
pub async fn prepare_order(
    db: &DbState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    id: i64,
) -> Result<Sale, ApiError> {
    debug!(id, "prepare_order command");
    apply(db, config, messenger, id, OrderAction::Prepare).await
}

pub async fn mark_order_ready(
    db: &DbState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    id: i64,
) -> Result<Sale, ApiError> {
    debug!(id, "mark_order_ready command");
    apply(db, config, messenger, id, OrderAction::MarkReady).await
}

pub async fn complete_order(
    db: &DbState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    id: i64,
) -> Result<Sale, ApiError> {
    debug!(id, "complete_order command");
    apply(db, config, messenger, id, OrderAction::Complete).await
}

async fn apply(
    db: &DbState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    id: i64,
    action: OrderAction,
) -> Result<Sale, ApiError> {
    let sale = db.inner().orders().advance(id, action).await?;

    if action.sends_invoice() {
        // The status change is already stored; a link failure must not undo it.
        if let Err(e) = send_invoice(config, messenger, &sale, InvoiceNotice::Confirmed) {
            warn!(id, error = %e, "Confirmed invoice could not be sent");
        }
    }

    Ok(sale)
}

/// Replaces the customer and/or the items of an order.
///
/// Totals are recomputed with the delivery fee the order was placed with.
pub async fn edit_order(db: &DbState, id: i64, revision: SaleRevision) -> Result<Sale, ApiError> {
    debug!(id, "edit_order command");
    Ok(db.inner().orders().revise(id, revision).await?)
}

/// Removes one order. Its invoice stays in the history.
pub async fn delete_order(db: &DbState, id: i64, confirmed: bool) -> Result<Sale, ApiError> {
    debug!(id, confirmed, "delete_order command");
    if !confirmed {
        return Err(ApiError::confirmation_required("delete_order"));
    }
    Ok(db.inner().orders().delete(id).await?)
}

/// Erases every order, invoice and notification. Returns how many orders
/// were removed.
pub async fn clear_history(db: &DbState, confirmed: bool) -> Result<usize, ApiError> {
    debug!(confirmed, "clear_history command");
    if !confirmed {
        return Err(ApiError::confirmation_required("clear_history"));
    }
    Ok(db.inner().orders().clear_history().await?)
}

/// Sends a plain copy of the invoice to the customer again.
///
/// Returns the opened link.
pub async fn resend_invoice(
    db: &DbState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    id: i64,
) -> Result<String, ApiError> {
    debug!(id, "resend_invoice command");
    let sale = get_order(db, id).await?;
    Ok(send_invoice(config, messenger, &sale, InvoiceNotice::Issued)?)
}

fn send_invoice(
    config: &ConfigState,
    messenger: &dyn Messenger,
    sale: &Sale,
    notice: InvoiceNotice,
) -> Result<String, CoreError> {
    let body = render_invoice(&config.store_name, sale, notice, &Local);
    let link = chat_link(&config.chat_base_url, &sale.customer.customer_phone, &body)?;
    messenger.open(&link);
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::add_to_cart;
    use crate::commands::checkout::{checkout, save_order_data};
    use crate::error::ErrorCode;
    use crate::testing::storefront;
    use crate::Storefront;
    use tcb_core::{CustomerProfile, Money, OrderStatus, PaymentMethod};

    async fn place(sf: &Storefront, order_type: OrderType, phone: &str) -> Sale {
        add_to_cart(&sf.db, &sf.cart, 1, Some(2)).await.unwrap();
        save_order_data(
            &sf.db,
            CustomerProfile {
                order_type,
                customer_name: "Ana".to_string(),
                customer_phone: phone.to_string(),
                address: Some("Calle 10 # 5-20".to_string()),
                address_details: None,
                table_number: Some("3".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();
        checkout(&sf.db, &sf.cart, &sf.config, sf.messenger(), PaymentMethod::Cash)
            .await
            .unwrap()
            .sale
    }

    #[tokio::test]
    async fn test_confirm_payment_sends_invoice_to_customer() {
        let (sf, outbox) = storefront().await;
        let sale = place(&sf, OrderType::Delivery, "3001234567").await;
        outbox.drain();

        let confirmed = confirm_payment(&sf.db, &sf.config, sf.messenger(), sale.id)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Preparing);
        assert_eq!(confirmed.total, Money::from_pesos(38_700));

        let links = outbox.drain();
        assert_eq!(links.len(), 1);
        assert!(links[0].contains("phone=3001234567"));

        let err = confirm_payment(&sf.db, &sf.config, sf.messenger(), sale.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(outbox.drain().is_empty());
    }

    #[tokio::test]
    async fn test_full_lifecycle_without_messages() {
        let (sf, outbox) = storefront().await;
        let sale = place(&sf, OrderType::Pickup, "3001234567").await;
        outbox.drain();

        let m = sf.messenger();
        assert_eq!(
            prepare_order(&sf.db, &sf.config, m, sale.id).await.unwrap().status,
            OrderStatus::Preparing
        );
        assert_eq!(
            mark_order_ready(&sf.db, &sf.config, m, sale.id).await.unwrap().status,
            OrderStatus::Ready
        );
        assert_eq!(
            complete_order(&sf.db, &sf.config, m, sale.id).await.unwrap().status,
            OrderStatus::Completed
        );
        assert!(outbox.drain().is_empty());

        let err = mark_order_ready(&sf.db, &sf.config, m, sale.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(
            get_order(&sf.db, sale.id).await.unwrap().status,
            OrderStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_edit_keeps_delivery_fee() {
        let (sf, _) = storefront().await;
        let sale = place(&sf, OrderType::Delivery, "3001234567").await;

        let mut items = sale.items.clone();
        items[0].quantity = 1;
        let edited = edit_order(
            &sf.db,
            sale.id,
            SaleRevision {
                customer: None,
                items: Some(items),
            },
        )
        .await
        .unwrap();

        assert_eq!(edited.subtotal, Money::from_pesos(15_000));
        assert_eq!(edited.tax, Money::from_pesos(2_850));
        assert_eq!(edited.delivery_fee, Money::from_pesos(3_000));
        assert_eq!(edited.total, Money::from_pesos(20_850));
        assert_eq!(edited.invoice_number, sale.invoice_number);
    }

    #[tokio::test]
    async fn test_destructive_actions_need_confirmation() {
        let (sf, _) = storefront().await;
        let sale = place(&sf, OrderType::DineIn, "3001234567").await;

        let err = delete_order(&sf.db, sale.id, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        let err = clear_history(&sf.db, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert_eq!(list_orders(&sf.db).await.unwrap().len(), 1);

        delete_order(&sf.db, sale.id, true).await.unwrap();
        assert!(list_orders(&sf.db).await.unwrap().is_empty());
        assert_eq!(sf.db.inner().invoices().list().await.unwrap().len(), 1);

        assert_eq!(
            get_order(&sf.db, sale.id).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn test_clear_history_and_tabs() {
        let (sf, _) = storefront().await;
        place(&sf, OrderType::Delivery, "3001234567").await;
        place(&sf, OrderType::Pickup, "3007654321").await;

        assert_eq!(
            orders_by_type(&sf.db, OrderType::Pickup).await.unwrap().len(),
            1
        );

        assert_eq!(clear_history(&sf.db, true).await.unwrap(), 2);
        assert!(list_orders(&sf.db).await.unwrap().is_empty());
        assert!(sf.db.inner().invoices().list().await.unwrap().is_empty());
        assert!(sf.db.inner().notifications().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resend_invoice() {
        let (sf, outbox) = storefront().await;
        let sale = place(&sf, OrderType::Pickup, "3001234567").await;
        outbox.drain();

        let link = resend_invoice(&sf.db, &sf.config, sf.messenger(), sale.id)
            .await
            .unwrap();
        assert_eq!(outbox.drain(), vec![link]);
    }
}
