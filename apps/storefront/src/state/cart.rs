//! # Cart State
//!
//! The customer's cart for the current session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Shell Action             Command                 Cart State Change     │
//! │  ────────────             ───────                 ─────────────────     │
//! │                                                                         │
//! │  Click "Agregar" ────────► add_to_cart() ───────► merge or push line   │
//! │                                                                         │
//! │  Click + / - ────────────► increment / decrement ► qty ± 1 (0 removes) │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► line removed         │
//! │                                                                         │
//! │  Checkout ───────────────► checkout() ──────────► cleared after save   │
//! │                                                                         │
//! │  NOTE: All operations acquire the Mutex lock exclusively.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tcb_core::{Cart, CartLine, Money, OrderTotals, OrderType};

/// Cart totals summary for API responses.
///
/// `tax` and `total` are a preview: the delivery fee is only known once the
/// customer picks an order type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let preview = OrderTotals::compute(cart.lines(), OrderType::Pickup);
        CartTotals {
            item_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal: preview.subtotal,
            tax: preview.tax,
            total: preview.total,
        }
    }
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Session cart state.
///
/// A poisoned lock is recovered: every cart method leaves the cart valid
/// even when interrupted.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|c| CartTotals::from(c));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_product(&product))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}
