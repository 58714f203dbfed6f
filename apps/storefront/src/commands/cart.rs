//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │   form   │     │ pending  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart        checkout                          │
//! │                   increment          (checkout.rs)                     │
//! │                   decrement                                             │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartResponse, CartState, DbState};
use tcb_core::CoreError;

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases
/// - If product not in cart: added as new line
/// - The line is a copy of the product as it is now; later menu edits
///   don't reach it
///
/// ## Arguments
/// * `product_id` - Catalog id of the product
/// * `quantity` - Quantity to add (default: 1)
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    product_id: i64,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id, quantity, "add_to_cart command");

    let product = db
        .inner()
        .catalog()
        .get(product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(product_id))?;

    cart.with_cart_mut(|c| {
        c.add_quantity(&product, quantity)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    })
    .map_err(ApiError::from)
}

/// One more unit of a line already in the cart.
pub fn increment_cart_item(cart: &CartState, product_id: i64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "increment_cart_item command");
    cart.with_cart_mut(|c| {
        c.increment(product_id)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    })
    .map_err(ApiError::from)
}

/// One less unit; the line disappears when it reaches zero.
pub fn decrement_cart_item(cart: &CartState, product_id: i64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "decrement_cart_item command");
    cart.with_cart_mut(|c| {
        c.decrement(product_id)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    })
    .map_err(ApiError::from)
}

/// Sets the quantity of a line.
///
/// ## Behavior
/// - Quantity 0 or less: removes the line
/// - Quantity > max: returns error
pub fn update_cart_item(
    cart: &CartState,
    product_id: i64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, quantity, "update_cart_item command");
    cart.with_cart_mut(|c| {
        c.set_quantity(product_id, quantity)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    })
    .map_err(ApiError::from)
}

pub fn remove_from_cart(cart: &CartState, product_id: i64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "remove_from_cart command");
    cart.with_cart_mut(|c| {
        c.remove(product_id)?;
        Ok::<CartResponse, CoreError>(CartResponse::from(&*c))
    })
    .map_err(ApiError::from)
}

/// Clears all lines from the cart.
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::storefront;
    use tcb_core::Money;

    #[tokio::test]
    async fn test_cart_flow() {
        let (sf, _) = storefront().await;
        let menu = sf.db.inner().catalog().list().await.unwrap();
        let first = &menu[0];
        let second = &menu[1];

        add_to_cart(&sf.db, &sf.cart, first.id, Some(2)).await.unwrap();
        add_to_cart(&sf.db, &sf.cart, second.id, None).await.unwrap();
        let cart = add_to_cart(&sf.db, &sf.cart, first.id, None).await.unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(
            cart.totals.subtotal,
            first.price.multiply_quantity(3) + second.price
        );

        let cart = decrement_cart_item(&sf.cart, second.id).unwrap();
        assert_eq!(cart.items.len(), 1);

        let cart = increment_cart_item(&sf.cart, first.id).unwrap();
        assert_eq!(cart.items[0].quantity, 4);

        let cart = update_cart_item(&sf.cart, first.id, 0).unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.totals.total, Money::zero());
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let (sf, _) = storefront().await;

        let err = add_to_cart(&sf.db, &sf.cart, 404, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = remove_from_cart(&sf.cart, 404).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_quantity_limits() {
        let (sf, _) = storefront().await;
        let product_id = sf.db.inner().catalog().list().await.unwrap()[0].id;

        let err = add_to_cart(&sf.db, &sf.cart, product_id, Some(1_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        add_to_cart(&sf.db, &sf.cart, product_id, None).await.unwrap();
        assert!(clear_cart(&sf.cart).items.is_empty());
    }
}
