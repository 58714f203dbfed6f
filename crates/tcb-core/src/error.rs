//! # Error Types
//!
//! Domain-specific error types for tcb-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tcb-core errors (this file)                                           │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tcb-db errors (separate crate)                                        │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  Storefront errors (in app)                                            │
//! │  └── ApiError         - What the browser shell sees (serialized)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Shell         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup that finds nothing is not an error: queries return `Option`.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with nothing in the cart.
    ///
    /// ## When This Occurs
    /// - The shell lets the customer reach checkout after clearing the cart
    /// - A second tab already completed the order and cleared the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// An admin edit removed every line from an order.
    #[error("Order {0} must keep at least one item")]
    EmptyOrder(i64),

    /// Product is not in the catalog (or not in the cart).
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Promotion is not in the catalog.
    #[error("Promotion not found: {0}")]
    PromotionNotFound(i64),

    /// Order (sale) is not in the lifecycle store.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The requested status change is not in the transition table.
    ///
    /// ## User Workflow
    /// ```text
    /// Admin clicks "Listo" on a pending order
    ///      │
    ///      ▼
    /// apply(MarkReady) on Pending
    ///      │
    ///      ▼
    /// InvalidTransition { order_id: 17.., from: "pending", action: "mark_ready" }
    /// ```
    #[error("Order {order_id} is {from}, cannot {action}")]
    InvalidTransition {
        order_id: i64,
        from: String,
        action: String,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The chat service base URL could not be used to build a link.
    #[error("Invalid chat link: {0}")]
    ChatLink(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is produced, so a failed validation never leaves
/// a half-written order behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. phone with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTransition {
            order_id: 42,
            from: "pending".to_string(),
            action: "mark_ready".to_string(),
        };
        assert_eq!(err.to_string(), "Order 42 is pending, cannot mark_ready");
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("customerName");
        assert_eq!(err.to_string(), "customerName is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("address").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
