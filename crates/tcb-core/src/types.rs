//! # Domain Types
//!
//! Records persisted by the storefront and shared with the browser shell.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (millis)    │   │  id (millis)    │   │  invoice_number │       │
//! │  │  name, price    │   │  invoice_number │◄─►│  items (frozen) │       │
//! │  │  category       │   │  status         │   │  totals         │       │
//! │  └─────────────────┘   │  items, totals  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │CustomerProfile  │   │  Notification   │   │ PaymentMethod   │       │
//! │  │  type, name     │   │  payment_conf.  │   │  nequi, cash..  │       │
//! │  │  phone, address │   │  read flag      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Rule
//! Sales and invoices hold copies of cart lines and the customer profile,
//! never references, so editing the catalog never rewrites order history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::ValidationError;
use crate::lifecycle::OrderStatus;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%; 1900 bps = 19% (Colombian IVA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// The IVA rate every order is taxed at.
    #[inline]
    pub const fn iva() -> Self {
        TaxRate(crate::IVA_RATE_BPS)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Menu section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    #[default]
    Food,
    Drinks,
    Promotion,
}

/// A sellable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Creation timestamp in epoch millis; unique within the catalog.
    pub id: i64,
    pub name: String,
    #[ts(type = "number")]
    pub price: Money,
    pub category: ProductCategory,
    /// Only used for food (e.g. "hamburguesas", "perros").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// URI or data URI.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: String,
}

/// A promotion banner managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Free text such as "10% OFF" or "2x1".
    pub discount: String,
    #[ts(as = "String")]
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub image: String,
    pub is_active: bool,
}

// =============================================================================
// Customer
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Delivery,
    Pickup,
    DineIn,
}

impl OrderType {
    /// Spanish label used in chat messages and the admin tabs.
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderType::Delivery => "Domicilio",
            OrderType::Pickup => "Recoger",
            OrderType::DineIn => "Comer en restaurante",
        }
    }
}

/// Customer and fulfilment data collected by the order-type form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub customer_name: String,
    pub customer_phone: String,
    /// Required for delivery orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment channels the restaurant accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Nequi,
    Daviplata,
    Bancolombia,
    Transfiya,
    Cash,
}

impl PaymentMethod {
    /// Every accepted method, in the order the checkout lists them.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Nequi,
        PaymentMethod::Daviplata,
        PaymentMethod::Bancolombia,
        PaymentMethod::Transfiya,
        PaymentMethod::Cash,
    ];

    /// Stable identifier stored in sales and invoices.
    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::Nequi => "nequi",
            PaymentMethod::Daviplata => "daviplata",
            PaymentMethod::Bancolombia => "bancolombia",
            PaymentMethod::Transfiya => "transfiya",
            PaymentMethod::Cash => "cash",
        }
    }

    /// Name shown to customers and in admin notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Nequi => "Nequi",
            PaymentMethod::Daviplata => "DaviPlata",
            PaymentMethod::Bancolombia => "Bancolombia",
            PaymentMethod::Transfiya => "Transfiya",
            PaymentMethod::Cash => "Efectivo",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.id() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.id().to_string()).collect(),
            })
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A frozen invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub name: String,
    pub quantity: i64,
    #[ts(type = "number")]
    pub unit_price: Money,
    /// unit_price × quantity.
    #[ts(type = "number")]
    pub total: Money,
}

impl From<&CartLine> for InvoiceItem {
    fn from(line: &CartLine) -> Self {
        InvoiceItem {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.price,
            total: line.line_total(),
        }
    }
}

/// The immutable financial record of a placed order.
///
/// Written once at intake, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer: CustomerProfile,
    pub order_type: OrderType,
    pub items: Vec<InvoiceItem>,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub delivery_fee: Money,
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Sale
// =============================================================================

/// The operational, status-bearing record of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Creation timestamp in epoch millis.
    pub id: i64,
    /// Shared with the paired invoice.
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer: CustomerProfile,
    pub items: Vec<CartLine>,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub delivery_fee: Money,
    #[ts(type = "number")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub order_type: OrderType,
    pub status: OrderStatus,
}

// =============================================================================
// Notification
// =============================================================================

/// Admin-facing alert raised once per intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    /// String tag, e.g. [`Notification::PAYMENT_CONFIRMATION`].
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Customer name.
    pub customer: String,
    #[ts(type = "number")]
    pub total: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Tag of the alert raised when an order waits for payment confirmation.
    pub const PAYMENT_CONFIRMATION: &'static str = "payment_confirmation";
}

// =============================================================================
// Checkout hand-off
// =============================================================================

/// Bundle shown on the confirmation-pending screen after checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub invoice: Invoice,
    pub order_data: CustomerProfile,
    /// Display name of the chosen payment method.
    pub payment_method: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_iva() {
        let rate = TaxRate::iva();
        assert_eq!(rate.bps(), 1900);
        assert!((rate.percentage() - 19.0).abs() < 0.001);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("nequi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Nequi);
        assert_eq!(" Cash ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!(matches!(
            "bitcoin".parse::<PaymentMethod>(),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_payment_method_display_names() {
        assert_eq!(PaymentMethod::Cash.display_name(), "Efectivo");
        assert_eq!(PaymentMethod::Daviplata.display_name(), "DaviPlata");
    }

    #[test]
    fn test_order_type_wire_names() {
        assert_eq!(serde_json::to_string(&OrderType::DineIn).unwrap(), "\"dine-in\"");
        let parsed: OrderType = serde_json::from_str("\"delivery\"").unwrap();
        assert_eq!(parsed, OrderType::Delivery);
    }

    #[test]
    fn test_customer_profile_reads_browser_shape() {
        let json = r#"{
            "type": "delivery",
            "customerName": "Ana",
            "customerPhone": "3001234567",
            "address": "Calle 10 # 5-20"
        }"#;
        let profile: CustomerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.order_type, OrderType::Delivery);
        assert_eq!(profile.address.as_deref(), Some("Calle 10 # 5-20"));
        assert!(profile.table_number.is_none());
    }
}
