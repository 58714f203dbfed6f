//! # Settings Repository
//!
//! Owner settings kept as plain strings: the cash drawer base and the
//! storefront background image.

use tracing::{info, warn};

use crate::error::DbResult;
use crate::store::{keys, KvStore};
use tcb_core::validation::validate_cash_base;
use tcb_core::{Money, DEFAULT_CASH_BASE_PESOS};

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    store: KvStore,
}

impl SettingsRepository {
    pub fn new(store: KvStore) -> Self {
        SettingsRepository { store }
    }

    /// The cash drawer base.
    ///
    /// Falls back to the default base when unset or unparsable.
    pub async fn cash_base(&self) -> DbResult<Money> {
        let Some(raw) = self.store.get(keys::CASH_BASE).await? else {
            return Ok(Money::from_pesos(DEFAULT_CASH_BASE_PESOS));
        };

        match parse_decimal(&raw) {
            Some(amount) => Ok(amount),
            None => {
                warn!(value = %raw, "Stored cash base is not a number, using default");
                Ok(Money::from_pesos(DEFAULT_CASH_BASE_PESOS))
            }
        }
    }

    /// Stores the cash base as a decimal string (`"50000"`).
    pub async fn set_cash_base(&self, amount: Money) -> DbResult<Money> {
        validate_cash_base(amount)?;

        let text = serde_json::to_string(&amount)?;
        self.store.set(keys::CASH_BASE, &text).await?;

        info!(cash_base = %amount, "Cash base updated");
        Ok(amount)
    }

    /// Writes the default cash base when none is stored.
    pub async fn ensure_cash_base(&self) -> DbResult<Money> {
        let _guard = self.store.lock().await;
        if self.store.get(keys::CASH_BASE).await?.is_some() {
            return self.cash_base().await;
        }

        self.store
            .set(keys::CASH_BASE, &DEFAULT_CASH_BASE_PESOS.to_string())
            .await?;
        Ok(Money::from_pesos(DEFAULT_CASH_BASE_PESOS))
    }

    pub async fn background_image(&self) -> DbResult<Option<String>> {
        self.store.get(keys::BACKGROUND_IMAGE).await
    }

    pub async fn set_background_image(&self, uri: &str) -> DbResult<()> {
        self.store.set(keys::BACKGROUND_IMAGE, uri).await
    }

    pub async fn clear_background_image(&self) -> DbResult<()> {
        self.store.remove(keys::BACKGROUND_IMAGE).await
    }
}

fn parse_decimal(raw: &str) -> Option<Money> {
    serde_json::from_str::<Money>(raw.trim()).ok()
}
