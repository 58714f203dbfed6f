//! # Cart
//!
//! The session-scoped cart and its by-value line snapshots.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Shell Action           Cart Method            Effect                   │
//! │  ────────────           ───────────            ──────                   │
//! │  Click product  ──────► add_product()  ──────► merge by id, qty + 1     │
//! │  Click "+"      ──────► increment()    ──────► qty + 1                  │
//! │  Click "-"      ──────► decrement()    ──────► qty - 1, drop at 0       │
//! │  Click remove   ──────► remove()       ──────► line dropped             │
//! │  Order placed   ──────► clear()        ──────► empty                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductCategory};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// A cart line: the product's fields frozen at the moment it was added,
/// plus a quantity.
///
/// Later catalog edits never reach a line already in a cart or an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub name: String,
    #[ts(type = "number")]
    pub price: Money,
    #[serde(default)]
    pub category: ProductCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: String,
    pub quantity: i64,
}

impl CartLine {
    /// Copies a product into a new line.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            subcategory: product.subcategory.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            specifications: product.specifications.clone(),
            quantity,
        }
    }

    /// unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product bumps quantity)
/// - Every quantity is > 0 (a line that would reach 0 is removed)
/// - At most [`MAX_CART_LINES`] lines, each at most [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of a product, merging into an existing line.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        self.add_quantity(product, 1)
    }

    /// Adds `quantity` units of a product, merging into an existing line.
    pub fn add_quantity(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == product.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Bumps a line's quantity by one.
    pub fn increment(&mut self, product_id: i64) -> CoreResult<()> {
        let current = self.quantity_of(product_id)?;
        self.set_quantity(product_id, current + 1)
    }

    /// Lowers a line's quantity by one, removing the line at zero.
    pub fn decrement(&mut self, product_id: i64) -> CoreResult<()> {
        let current = self.quantity_of(product_id)?;
        self.set_quantity(product_id, current - 1)
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove(product_id);
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by product id.
    pub fn remove(&mut self, product_id: i64) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::ProductNotFound(product_id))
        } else {
            Ok(())
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities (the badge on the cart button).
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ price × quantity, before IVA and delivery.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn quantity_of(&self, product_id: i64) -> CoreResult<i64> {
        self.lines
            .iter()
            .find(|l| l.id == product_id)
            .map(|l| l.quantity)
            .ok_or(CoreError::ProductNotFound(product_id))
    }
}
