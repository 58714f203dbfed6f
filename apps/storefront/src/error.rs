//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  UI shell                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  call('mark_order_ready')                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── DbError::QueryFailed("...") ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Domain Error? ─── CoreError::InvalidTransition ── ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  e.code    = "BUSINESS_LOGIC"                                           │
//! │  e.message = "Order 1700000000000 is pending, cannot mark_ready"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their detail and reach the shell with a
//! generic message.

use serde::Serialize;
use tcb_core::{CoreError, ValidationError};
use tcb_db::DbError;

/// API error returned from storefront commands.
///
/// ## Serialization
/// This is what the shell receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 1700000000000"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Storage operation failed
    DatabaseError,

    /// Business rule refused the operation (e.g. illegal status change)
    BusinessLogic,

    /// Internal error
    Internal,

    /// Cart operation failed
    CartError,

    /// A destructive action was called without confirmation
    ConfirmationRequired,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Refusal of a destructive action that was not confirmed.
    pub fn confirmation_required(action: &str) -> Self {
        ApiError::new(
            ErrorCode::ConfirmationRequired,
            format!("{} requires confirmation", action),
        )
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::Domain(e) => ApiError::from(e),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Serialization(e) => {
                tracing::error!("Failed to encode stored value: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, "Cart is empty"),
            CoreError::EmptyOrder(id) => {
                ApiError::validation(format!("Order {} must keep at least one item", id))
            }
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::PromotionNotFound(id) => ApiError::not_found("Promotion", id),
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", id),
            e @ CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartError,
                format!("Cart cannot have more than {} items", max),
            ),
            CoreError::QuantityTooLarge { requested, max } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Quantity {} exceeds maximum allowed ({})", requested, max),
            ),
            CoreError::ChatLink(e) => {
                tracing::error!("Chat link could not be built: {}", e);
                ApiError::internal("Chat link could not be built")
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::confirmation_required("clear_history");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CONFIRMATION_REQUIRED");
        assert_eq!(json["message"], "clear_history requires confirmation");
    }

    #[test]
    fn test_domain_errors_keep_their_meaning() {
        let err = ApiError::from(DbError::Domain(CoreError::OrderNotFound("42".into())));
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = ApiError::from(CoreError::InvalidTransition {
            order_id: 7,
            from: "pending".into(),
            action: "mark_ready".into(),
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Order 7 is pending, cannot mark_ready");

        let err = ApiError::from(CoreError::Validation(ValidationError::required("customerName")));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: kv_store".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("kv_store"));
    }
}
