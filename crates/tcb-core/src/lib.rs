//! # tcb-core: Pure Business Logic for the Container Burger storefront
//!
//! This crate holds the order core of the storefront as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Container Burger Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser shell                                │   │
//! │  │   Catalog ──► Cart ──► Checkout ──► Admin orders ──► Status     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tcb-storefront commands                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tcb-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  money  │ │  cart   │ │  order  │ │lifecycle │ │ query  │  │   │
//! │  │   │ IVA 19% │ │ CartLine│ │ intake  │ │ statuses │ │ lookup │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tcb-db (persisted collections)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Sale, Invoice, Notification, ...)
//! - [`money`] - Peso amounts with integer centavo arithmetic
//! - [`cart`] - Session cart and by-value line snapshots
//! - [`order`] - Order intake: totals, snapshots, identities
//! - [`lifecycle`] - Order status state machine and admin edits
//! - [`query`] - Order-status lookup and dashboard projections
//! - [`messaging`] - Chat message rendering and deep links
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tcb_core::money::Money;
//! use tcb_core::order::OrderTotals;
//! use tcb_core::cart::CartLine;
//! use tcb_core::types::{OrderType, Product, ProductCategory};
//!
//! let burger = Product {
//!     id: 1,
//!     name: "Burger".to_string(),
//!     price: Money::from_pesos(15_000),
//!     category: ProductCategory::Food,
//!     subcategory: None,
//!     image: "/placeholder.svg".to_string(),
//!     description: String::new(),
//!     specifications: String::new(),
//! };
//! let lines = vec![CartLine::from_product(&burger, 2)];
//!
//! let totals = OrderTotals::compute(&lines, OrderType::Delivery);
//! assert_eq!(totals.subtotal, Money::from_pesos(30_000));
//! assert_eq!(totals.tax, Money::from_pesos(5_700));
//! assert_eq!(totals.total, Money::from_pesos(38_700));
//! ```

pub mod cart;
pub mod error;
pub mod lifecycle;
pub mod messaging;
pub mod money;
pub mod order;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use lifecycle::{OrderAction, OrderStatus, SaleRevision};
pub use money::Money;
pub use order::{OrderDraft, OrderIdentity, OrderTotals, PlacedOrder};
pub use query::{DashboardSummary, OrderQuery};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Colombian IVA applied to every order subtotal, in basis points (19%).
///
/// Fixed by law for the menu; not a runtime setting.
pub const IVA_RATE_BPS: u32 = 1900;

/// Flat delivery fee in pesos, charged only on delivery orders.
pub const DELIVERY_FEE_PESOS: i64 = 3000;

/// Cash drawer base used until the owner sets one, in pesos.
pub const DEFAULT_CASH_BASE_PESOS: i64 = 50_000;

/// Prefix of generated invoice numbers (`TCB-<epoch millis>`).
pub const DEFAULT_INVOICE_PREFIX: &str = "TCB";

/// Maximum distinct lines in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
