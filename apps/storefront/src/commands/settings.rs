//! # Settings Commands
//!
//! Cash drawer base, storefront background and the read-only configuration.

use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use tcb_core::Money;

pub async fn get_cash_base(db: &DbState) -> Result<Money, ApiError> {
    debug!("get_cash_base command");
    Ok(db.inner().settings().cash_base().await?)
}

pub async fn set_cash_base(db: &DbState, amount: Money) -> Result<Money, ApiError> {
    debug!(%amount, "set_cash_base command");
    Ok(db.inner().settings().set_cash_base(amount).await?)
}

pub async fn get_background_image(db: &DbState) -> Result<Option<String>, ApiError> {
    debug!("get_background_image command");
    Ok(db.inner().settings().background_image().await?)
}

/// Stores an image URI (or data URI) for the storefront background.
pub async fn set_background_image(db: &DbState, uri: String) -> Result<(), ApiError> {
    debug!(len = uri.len(), "set_background_image command");
    if uri.trim().is_empty() {
        return Err(ApiError::validation("backgroundImage is required"));
    }
    Ok(db.inner().settings().set_background_image(&uri).await?)
}

pub async fn clear_background_image(db: &DbState) -> Result<(), ApiError> {
    debug!("clear_background_image command");
    Ok(db.inner().settings().clear_background_image().await?)
}

/// The storefront configuration as the shell sees it.
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::storefront;

    #[tokio::test]
    async fn test_cash_base_round_trip() {
        let (sf, _) = storefront().await;

        assert_eq!(get_cash_base(&sf.db).await.unwrap(), Money::from_pesos(50_000));
        set_cash_base(&sf.db, Money::from_pesos(120_000)).await.unwrap();
        assert_eq!(get_cash_base(&sf.db).await.unwrap(), Money::from_pesos(120_000));

        let err = set_cash_base(&sf.db, Money::from_pesos(-5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_background_image() {
        let (sf, _) = storefront().await;

        assert!(set_background_image(&sf.db, " ".to_string()).await.is_err());
        set_background_image(&sf.db, "/fondo.png".to_string()).await.unwrap();
        assert_eq!(
            get_background_image(&sf.db).await.unwrap().as_deref(),
            Some("/fondo.png")
        );
        clear_background_image(&sf.db).await.unwrap();
        assert!(get_background_image(&sf.db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_config_is_serialisable_without_db_path() {
        let (sf, _) = storefront().await;
        let json = serde_json::to_value(get_config(&sf.config)).unwrap();
        assert_eq!(json["invoicePrefix"], "TCB");
        assert!(json.get("databasePath").is_none());
    }
}
