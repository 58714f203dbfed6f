//! # Checkout Commands
//!
//! The customer side of order intake.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order-type form                                                        │
//! │       │  save_order_data(profile)                                       │
//! │       ▼                                                                 │
//! │  Checkout page ── picks payment method                                  │
//! │       │  checkout(method)                                               │
//! │       ▼                                                                 │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  1. Validate cart + profile, compute totals (OrderDraft)       │    │
//! │  │  2. Render the order request and build the chat link           │    │
//! │  │  3. Persist Sale + Invoice + Notification in one batch         │    │
//! │  │  4. Store the pending-order hand-off                           │    │
//! │  │  5. Clear cart and order data                                  │    │
//! │  │  6. Open the chat link (business phone)                        │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Confirmation page ── take_pending_order()                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written when validation fails, and the link is only opened
//! once the order is stored. Steps 4 and 5 run after the order is committed;
//! a failure there is logged and checkout still completes.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::messenger::Messenger;
use crate::state::{CartState, ConfigState, DbState};
use tcb_core::messaging::{chat_link, render_order_request};
use tcb_core::validation::validate_customer_profile;
use tcb_core::{CustomerProfile, Invoice, OrderDraft, PaymentMethod, PendingOrder, Sale};

/// What the shell receives after a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub sale: Sale,
    pub invoice: Invoice,
    /// Link opened towards the business chat number.
    pub chat_link: String,
}

/// Stores the profile from the order-type form.
pub async fn save_order_data(db: &DbState, profile: CustomerProfile) -> Result<(), ApiError> {
    debug!(order_type = ?profile.order_type, "save_order_data command");
    validate_customer_profile(&profile)?;
    Ok(db.inner().handoff().save_order_data(&profile).await?)
}

/// The stored profile, if the customer filled the form.
pub async fn get_order_data(db: &DbState) -> Result<Option<CustomerProfile>, ApiError> {
    debug!("get_order_data command");
    Ok(db.inner().handoff().order_data().await?)
}

/// Places the order held in the cart.
///
/// ## Errors
/// - `VALIDATION_ERROR` when no order data was saved or it is incomplete
/// - `CART_ERROR` when the cart is empty
pub async fn checkout(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    messenger: &dyn Messenger,
    payment_method: PaymentMethod,
) -> Result<CheckoutResponse, ApiError> {
    debug!(%payment_method, "checkout command");
    let db = db.inner();

    let profile = db
        .handoff()
        .order_data()
        .await?
        .ok_or_else(|| ApiError::validation("orderData is required"))?;

    let lines = cart.with_cart(|c| c.lines().to_vec());
    let draft = OrderDraft::prepare(&lines, &profile, payment_method)?;

    let body = render_order_request(&config.store_name, &draft, &config.payment_accounts);
    let link = chat_link(&config.chat_base_url, &config.business_phone, &body)?;

    let placed = db
        .orders()
        .record(draft, &config.invoice_prefix, Utc::now())
        .await?;

    let pending = PendingOrder {
        invoice: placed.invoice.clone(),
        order_data: profile,
        payment_method: payment_method.display_name().to_string(),
    };
    if let Err(e) = db.handoff().save_pending_order(&pending).await {
        warn!(
            invoice = %placed.invoice.invoice_number,
            error = %e,
            "Failed to store the confirmation hand-off"
        );
    }
    if let Err(e) = db.handoff().clear_order_data().await {
        warn!(
            invoice = %placed.invoice.invoice_number,
            error = %e,
            "Failed to clear saved order data"
        );
    }
    cart.with_cart_mut(|c| c.clear());

    info!(
        invoice = %placed.invoice.invoice_number,
        total = %placed.sale.total,
        "Checkout complete"
    );
    messenger.open(&link);

    Ok(CheckoutResponse {
        sale: placed.sale,
        invoice: placed.invoice,
        chat_link: link,
    })
}

/// The confirmation-page bundle; a second call returns `None`.
pub async fn take_pending_order(db: &DbState) -> Result<Option<PendingOrder>, ApiError> {
    debug!("take_pending_order command");
    Ok(db.inner().handoff().take_pending_order().await?)
}
