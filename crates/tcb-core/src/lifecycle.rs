//! # Order Lifecycle
//!
//! The status state machine of a [`Sale`] and the admin edit path.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sale Status Transitions                            │
//! │                                                                         │
//! │               confirm_payment ─┐                                        │
//! │  ┌─────────┐                   ▼ ┌───────────┐  mark_ready  ┌───────┐  │
//! │  │ PENDING │ ──── prepare ─────► │ PREPARING │ ───────────► │ READY │  │
//! │  └─────────┘                     └───────────┘              └───┬───┘  │
//! │                                                                 │      │
//! │                                                        complete │      │
//! │                                                                 ▼      │
//! │                                                        ┌───────────┐   │
//! │                                                        │ COMPLETED │   │
//! │                                                        └───────────┘   │
//! │                                                                         │
//! │  Deletion and history clears remove records; they are not transitions.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition moves exactly one step forward. A status is never
//! re-entered once left.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::order::OrderTotals;
use crate::types::{CustomerProfile, Sale};
use crate::validation::{validate_customer_profile, validate_price, validate_quantity};

// =============================================================================
// Order Status
// =============================================================================

/// Where a sale is in the kitchen flow.
///
/// The derived ordering follows the flow, so `Pending < Completed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, waiting for the admin to confirm payment.
    #[default]
    Pending,
    /// In the kitchen.
    Preparing,
    /// Ready for hand-over.
    Ready,
    /// Handed over. Terminal.
    Completed,
}

impl OrderStatus {
    /// Returns the status an action leads to, or `None` when the
    /// transition table has no such edge.
    pub fn apply(self, action: OrderAction) -> Option<OrderStatus> {
        use OrderAction::*;
        use OrderStatus::*;

        match (self, action) {
            (Pending, ConfirmPayment) | (Pending, Prepare) => Some(Preparing),
            (Preparing, MarkReady) => Some(Ready),
            (Ready, Complete) => Some(Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Wire identifier (`pending`, `preparing`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }

    /// Spanish label shown on admin badges and the status page.
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::Preparing => "Preparando",
            OrderStatus::Ready => "Listo",
            OrderStatus::Completed => "Completado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Action
// =============================================================================

/// An admin control on the orders board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Payment proof received: move to the kitchen and send the invoice.
    ConfirmPayment,
    /// Move to the kitchen without confirming payment.
    Prepare,
    MarkReady,
    Complete,
}

impl OrderAction {
    /// Whether a successful transition should send the customer their
    /// confirmed invoice.
    pub fn sends_invoice(&self) -> bool {
        matches!(self, OrderAction::ConfirmPayment)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::ConfirmPayment => "confirm_payment",
            OrderAction::Prepare => "prepare",
            OrderAction::MarkReady => "mark_ready",
            OrderAction::Complete => "complete",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Revision
// =============================================================================

/// An admin edit of a placed order.
///
/// Absent fields are left as they are. Status, invoice number, date and id
/// are never part of a revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleRevision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CartLine>>,
}

impl SaleRevision {
    pub fn is_empty(&self) -> bool {
        self.customer.is_none() && self.items.is_none()
    }
}

// =============================================================================
// Sale transitions and edits
// =============================================================================

impl Sale {
    /// Moves the sale one step along the state machine.
    ///
    /// ## When This Fails
    /// - The action has no edge from the current status (e.g. `mark_ready`
    ///   on a pending order, anything on a completed order)
    ///
    /// The sale is left untouched on failure.
    pub fn advance(&mut self, action: OrderAction) -> CoreResult<OrderStatus> {
        let next = self
            .status
            .apply(action)
            .ok_or_else(|| CoreError::InvalidTransition {
                order_id: self.id,
                from: self.status.to_string(),
                action: action.to_string(),
            })?;

        self.status = next;
        Ok(next)
    }

    /// Applies an admin edit and recomputes the money fields.
    ///
    /// The delivery fee stays as stored at intake; subtotal, tax and total
    /// are recomputed from the (possibly new) items. All checks run before
    /// any field is replaced.
    pub fn revise(&mut self, revision: SaleRevision) -> CoreResult<()> {
        if let Some(customer) = &revision.customer {
            validate_customer_profile(customer)?;
            if customer.order_type != self.order_type {
                return Err(ValidationError::InvalidFormat {
                    field: "type".to_string(),
                    reason: "order type cannot change after intake".to_string(),
                }
                .into());
            }
        }

        if let Some(items) = &revision.items {
            if items.is_empty() {
                return Err(CoreError::EmptyOrder(self.id));
            }
            for line in items {
                validate_quantity(line.quantity)?;
                validate_price(line.price)?;
            }
        }

        if let Some(customer) = revision.customer {
            self.customer = customer;
        }
        if let Some(items) = revision.items {
            self.items = items;
        }

        let totals = OrderTotals::recompute(&self.items, self.delivery_fee);
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.total = totals.total;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
