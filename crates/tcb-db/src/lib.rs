//! # tcb-db: Persistence Layer for the Container Burger storefront
//!
//! Every persisted collection is a JSON value under a fixed key, kept in a
//! SQLite key-value table and accessed through typed repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Data Flow                                │
//! │                                                                         │
//! │  Storefront command (checkout, confirm_payment, lookup_order, ...)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tcb-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ Catalog       │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ Order         │    │ 001_kv_store │   │   │
//! │  │   │ KvStore       │    │ Invoice       │    │              │   │   │
//! │  │   │ (store.rs)    │    │ Notification  │    │              │   │   │
//! │  │   │               │    │ Settings      │    │              │   │   │
//! │  │   │               │    │ Handoff       │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (kv_store table)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`store`] - Key-value access, write batches, persisted key names
//! - [`collection`] - Typed JSON collections with corruption tolerance
//! - [`repository`] - Repository implementations
//! - [`menu`] - Default menu and promotions for first start
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tcb_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tcb.db")).await?;
//! let placed = db.orders().record(draft, "TCB", Utc::now()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod error;
pub mod menu;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{keys, KvStore, WriteBatch};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::handoff::HandoffRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::notification::NotificationRepository;
pub use repository::order::OrderRepository;
pub use repository::settings::SettingsRepository;
