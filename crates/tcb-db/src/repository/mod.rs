//! # Repository Module
//!
//! One repository per persisted concern, each a thin typed layer over the
//! shared [`KvStore`](crate::store::KvStore).
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Storefront command                                                     │
//! │       │                                                                 │
//! │       │  db.orders().advance(id, OrderAction::MarkReady)                │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── list / get / find                                                  │
//! │  ├── record / advance / revise                                          │
//! │  └── delete / clear_history                                             │
//! │       │                                                                 │
//! │       │  lock → load "sales" → transform → write batch                  │
//! │       ▼                                                                 │
//! │  kv_store table                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Products and promotions
//! - [`OrderRepository`](order::OrderRepository) - Intake persistence and the order lifecycle
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Read-only invoice history
//! - [`NotificationRepository`](notification::NotificationRepository) - Admin alerts
//! - [`SettingsRepository`](settings::SettingsRepository) - Cash base, background image
//! - [`HandoffRepository`](handoff::HandoffRepository) - Checkout hand-off records

pub mod catalog;
pub mod handoff;
pub mod invoice;
pub mod notification;
pub mod order;
pub mod settings;

use chrono::{DateTime, Utc};

/// Smallest epoch-millis id at or after `now` that `taken` does not reject.
///
/// Records created in the same millisecond get consecutive ids.
pub(crate) fn next_millis_id(now: DateTime<Utc>, taken: impl Fn(i64) -> bool) -> i64 {
    let mut id = now.timestamp_millis();
    while taken(id) {
        id += 1;
    }
    id
}
