//! # Container Burger Storefront
//!
//! Session state and commands for the storefront and its admin panel. A UI
//! shell owns a [`Storefront`] and calls the functions in [`commands`].
//!
//! ## Module Organization
//! ```text
//! tcb_storefront/
//! ├── lib.rs          ◄─── You are here (startup, Storefront)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/       ◄─── One module per screen
//! ├── messenger.rs    ◄─── Chat link opener
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod messenger;
pub mod state;

use chrono::Local;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use messenger::{Messenger, TracingMessenger};
use state::{CartState, ConfigState, DbState};
use tcb_db::menu::{default_menu, default_promotions};
use tcb_db::{Database, DbConfig};

/// Everything a running storefront holds.
pub struct Storefront {
    pub db: DbState,
    pub cart: CartState,
    pub config: ConfigState,
    messenger: Arc<dyn Messenger>,
}

impl Storefront {
    /// Opens the storefront database and prepares session state.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Storefront Startup                                │
    /// │                                                                         │
    /// │  1. Determine Database Path ──────────────────────────────────────────► │
    /// │     • config.database_path (TCB_DB_PATH) when set                       │
    /// │     • otherwise the platform data directory                             │
    /// │                                                                         │
    /// │  2. Connect to Database ──────────────────────────────────────────────► │
    /// │     • SQLite with WAL mode                                              │
    /// │     • Run pending migrations                                            │
    /// │                                                                         │
    /// │  3. Seed First Start ─────────────────────────────────────────────────► │
    /// │     • Starter menu and promotions when none are stored                  │
    /// │     • Default cash base                                                 │
    /// │                                                                         │
    /// │  4. Initialize State Objects ─────────────────────────────────────────► │
    /// │     • DbState, empty CartState, ConfigState, TracingMessenger           │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn open(config: ConfigState) -> Result<Self, ApiError> {
        let db_path = match &config.database_path {
            Some(path) => path.clone(),
            None => default_database_path()?,
        };
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        Self::with_database(db, config, Arc::new(TracingMessenger)).await
    }

    /// Builds a storefront over an open database.
    pub async fn with_database(
        db: Database,
        config: ConfigState,
        messenger: Arc<dyn Messenger>,
    ) -> Result<Self, ApiError> {
        let catalog = db.catalog();
        catalog.seed_if_empty(&default_menu()).await?;
        catalog
            .seed_promotions_if_empty(&default_promotions(Local::now().date_naive()))
            .await?;
        db.settings().ensure_cash_base().await?;

        info!(store = %config.store_name, "Storefront ready");
        Ok(Storefront {
            db: DbState::new(db),
            cart: CartState::new(),
            config,
            messenger,
        })
    }

    /// The chat link opener used by checkout and invoice commands.
    pub fn messenger(&self) -> &dyn Messenger {
        self.messenger.as_ref()
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tcb=trace` - Show trace for the storefront crates only
/// - Default: `info,tcb=debug,sqlx=warn`
///
/// Calling it again (e.g. from several tests) is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tcb=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.container-burger.pos/tcb.db`
/// - **Windows**: `%APPDATA%\container-burger\pos\data\tcb.db`
/// - **Linux**: `~/.local/share/pos/tcb.db`
pub fn default_database_path() -> Result<PathBuf, ApiError> {
    let proj_dirs = ProjectDirs::from("com", "container-burger", "pos")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir).map_err(|e| {
        ApiError::internal(format!("Could not create {}: {}", data_dir.display(), e))
    })?;

    Ok(data_dir.join("tcb.db"))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::commands::cart::add_to_cart;
    use crate::commands::checkout::{checkout, save_order_data};
    use crate::messenger::OutboxMessenger;
    use tcb_core::{CustomerProfile, OrderType, PaymentMethod, Sale};

    /// A seeded in-memory storefront and the outbox its links land in.
    pub(crate) async fn storefront() -> (Storefront, Arc<OutboxMessenger>) {
        init_tracing();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let outbox = Arc::new(OutboxMessenger::new());
        let sf = Storefront::with_database(db, ConfigState::default(), outbox.clone())
            .await
            .unwrap();
        (sf, outbox)
    }

    /// One Hamburguesa Clásica for pickup, paid with Nequi.
    pub(crate) async fn place_pickup_order(sf: &Storefront) -> Sale {
        add_to_cart(&sf.db, &sf.cart, 1, None).await.unwrap();
        save_order_data(
            &sf.db,
            CustomerProfile {
                order_type: OrderType::Pickup,
                customer_name: "Ana".to_string(),
                customer_phone: "3001234567".to_string(),
                address: None,
                address_details: None,
                table_number: None,
                notes: None,
            },
        )
        .await
        .unwrap();
        checkout(&sf.db, &sf.cart, &sf.config, sf.messenger(), PaymentMethod::Nequi)
            .await
            .unwrap()
            .sale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::storefront;

    #[tokio::test]
    async fn test_first_start_seeds_once() {
        let (sf, _) = storefront().await;
        let db = sf.db.inner().clone();
        let products = db.catalog().count().await.unwrap();
        assert!(products > 0);

        db.catalog().delete(1).await.unwrap();
        let reopened = Storefront::with_database(db, ConfigState::default(), Arc::new(TracingMessenger))
            .await
            .unwrap();
        assert_eq!(
            reopened.db.inner().catalog().count().await.unwrap(),
            products - 1
        );
    }

    #[tokio::test]
    async fn test_open_uses_configured_path() {
        let path = std::env::temp_dir().join(format!("tcb-open-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = ConfigState {
            database_path: Some(path.clone()),
            ..ConfigState::default()
        };
        let sf = Storefront::open(config).await.unwrap();
        assert!(sf.db.inner().health_check().await);
        sf.db.inner().close().await;

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
