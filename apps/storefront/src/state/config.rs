//! # Configuration State
//!
//! Storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TCB_*`)
//! 2. Defaults (this file)
//!
//! The IVA rate and the delivery fee are constants in `tcb-core`, not
//! configuration.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use tcb_core::messaging::chat_link;
use tcb_core::DEFAULT_INVOICE_PREFIX;

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invoice prefix must not be empty")]
    EmptyInvoicePrefix,

    #[error("Business phone must contain only digits: {0}")]
    InvalidPhone(String),

    #[error("Chat service URL is invalid: {0}")]
    InvalidChatUrl(String),
}

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name shown in chat messages
    pub store_name: String,

    /// Chat number that receives order requests (country code, digits only)
    pub business_phone: String,

    /// Chat service endpoint the deep links point at
    pub chat_base_url: String,

    /// Prefix of every invoice number (`TCB-1700000000000`)
    pub invoice_prefix: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Account lines published in the order request message
    pub payment_accounts: Vec<String>,

    /// Database file override; the platform data directory is used when unset
    #[serde(skip)]
    pub database_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        ConfigState {
            store_name: "The Container Burger".to_string(),
            business_phone: "573202466440".to_string(),
            chat_base_url: "https://api.whatsapp.com/send".to_string(),
            invoice_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
            currency_code: "COP".to_string(),
            payment_accounts: vec![
                "*Nequi:* 320-246-6440".to_string(),
                "*Bancolombia:* 1234-5678-9012".to_string(),
                "*DaviPlata:* 320-246-6440".to_string(),
                "*Efectivo:* Pago contra entrega".to_string(),
            ],
            database_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TCB_STORE_NAME`: Override store name
    /// - `TCB_BUSINESS_PHONE`: Override the business chat number
    /// - `TCB_CHAT_BASE_URL`: Override the chat service endpoint
    /// - `TCB_INVOICE_PREFIX`: Override the invoice number prefix
    /// - `TCB_DB_PATH`: Use a specific database file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("TCB_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(phone) = lookup("TCB_BUSINESS_PHONE") {
            config.business_phone = phone.trim().to_string();
        }

        if let Some(url) = lookup("TCB_CHAT_BASE_URL") {
            config.chat_base_url = url.trim().to_string();
        }

        if let Some(prefix) = lookup("TCB_INVOICE_PREFIX") {
            config.invoice_prefix = prefix.trim().to_string();
        }

        if let Some(path) = lookup("TCB_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the values a chat link or invoice number is built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.invoice_prefix.is_empty() {
            return Err(ConfigError::EmptyInvoicePrefix);
        }

        if self.business_phone.is_empty()
            || !self.business_phone.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidPhone(self.business_phone.clone()));
        }

        chat_link(&self.chat_base_url, &self.business_phone, "")
            .map_err(|e| ConfigError::InvalidChatUrl(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConfigState::default();
        config.validate().unwrap();
        assert_eq!(config.invoice_prefix, "TCB");
        assert_eq!(config.currency_code, "COP");
        assert_eq!(config.payment_accounts.len(), 4);
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_vars(vars(&[
            ("TCB_STORE_NAME", "Container Norte"),
            ("TCB_INVOICE_PREFIX", " CBN "),
            ("TCB_DB_PATH", "/tmp/tcb.db"),
        ]))
        .unwrap();

        assert_eq!(config.store_name, "Container Norte");
        assert_eq!(config.invoice_prefix, "CBN");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/tcb.db")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ConfigState::from_vars(vars(&[("TCB_INVOICE_PREFIX", "  ")])),
            Err(ConfigError::EmptyInvoicePrefix)
        ));
        assert!(matches!(
            ConfigState::from_vars(vars(&[("TCB_BUSINESS_PHONE", "+57 320")])),
            Err(ConfigError::InvalidPhone(_))
        ));
        assert!(matches!(
            ConfigState::from_vars(vars(&[("TCB_CHAT_BASE_URL", "not a url")])),
            Err(ConfigError::InvalidChatUrl(_))
        ));
    }
}
