//! # Commands Module
//!
//! Every operation the UI shell can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (exports)
//! ├── catalog.rs        ◄─── Products and promotions (admin)
//! ├── cart.rs           ◄─── Cart manipulation
//! ├── checkout.rs       ◄─── Order data hand-off and order intake
//! ├── orders.rs         ◄─── Order lifecycle (admin)
//! ├── invoices.rs       ◄─── Invoice history
//! ├── notifications.rs  ◄─── Admin alerts
//! ├── dashboard.rs      ◄─── Dashboard cards
//! ├── status.rs         ◄─── Public order-status lookup
//! └── settings.rs       ◄─── Cash base, background image, configuration
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! list_orders(&sf.db)
//!
//! // Only needs cart
//! get_cart(&sf.cart)
//!
//! // Database, cart, configuration and the messenger
//! checkout(&sf.db, &sf.cart, &sf.config, sf.messenger(), PaymentMethod::Nequi)
//! ```
//!
//! Commands return `Result<T, ApiError>`; a lookup miss is `Ok(None)` where
//! the shell expects "nothing found" rather than an error.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dashboard;
pub mod invoices;
pub mod notifications;
pub mod orders;
pub mod settings;
pub mod status;
