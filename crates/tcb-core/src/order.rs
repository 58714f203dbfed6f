//! # Order Intake
//!
//! Turns a cart and a customer profile into a paired [`Sale`] and
//! [`Invoice`] plus one admin [`Notification`].
//!
//! ## Intake Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Order Intake                                    │
//! │                                                                         │
//! │  cart lines ─┐                                                          │
//! │  customer  ──┼──► OrderDraft::prepare()                                 │
//! │  payment   ──┘        │  1. non-empty cart, valid profile               │
//! │                       │  2. deep copy of lines and profile              │
//! │                       │  3. OrderTotals::compute()                      │
//! │                       ▼                                                 │
//! │                  OrderDraft ──► OrderDraft::place(identity, now)        │
//! │                                      │                                  │
//! │                                      ├──► Sale     (status: pending)    │
//! │                                      ├──► Invoice  (same number/totals) │
//! │                                      └──► Notification (unread)         │
//! │                                                                         │
//! │  Nothing is produced when step 1 fails.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence is the caller's job; this module only computes values.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::lifecycle::OrderStatus;
use crate::money::Money;
use crate::types::{
    CustomerProfile, Invoice, InvoiceItem, Notification, OrderType, PaymentMethod, Sale, TaxRate,
};
use crate::validation::{validate_customer_profile, validate_quantity};
use crate::DELIVERY_FEE_PESOS;

// =============================================================================
// Totals
// =============================================================================

/// The four derived money amounts of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub delivery_fee: Money,
    #[ts(type = "number")]
    pub total: Money,
}

impl OrderTotals {
    /// Computes totals for a new order.
    ///
    /// ```text
    /// subtotal     = Σ price × quantity
    /// tax          = subtotal × 19%
    /// delivery_fee = 3000 if delivery, else 0
    /// total        = subtotal + tax + delivery_fee
    /// ```
    pub fn compute(lines: &[CartLine], order_type: OrderType) -> Self {
        OrderTotals::recompute(lines, delivery_fee_for(order_type))
    }

    /// Computes totals with a given delivery fee (admin edits keep the fee
    /// charged at intake).
    pub fn recompute(lines: &[CartLine], delivery_fee: Money) -> Self {
        let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
        let tax = subtotal.calculate_tax(TaxRate::iva());

        OrderTotals {
            subtotal,
            tax,
            delivery_fee,
            total: subtotal + tax + delivery_fee,
        }
    }
}

/// Flat fee for delivery orders, zero otherwise.
pub fn delivery_fee_for(order_type: OrderType) -> Money {
    match order_type {
        OrderType::Delivery => Money::from_pesos(DELIVERY_FEE_PESOS),
        OrderType::Pickup | OrderType::DineIn => Money::zero(),
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Identifiers handed out at intake, all derived from the intake instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIdentity {
    pub sale_id: i64,
    /// `<PREFIX>-<epoch millis>`.
    pub invoice_number: String,
    pub notification_id: i64,
}

impl OrderIdentity {
    /// Identity taken straight from the clock.
    pub fn from_clock(prefix: &str, now: DateTime<Utc>) -> Self {
        OrderIdentity::at_millis(prefix, now.timestamp_millis())
    }

    /// Identity from the clock, moved forward one millisecond at a time
    /// until it collides with nothing already stored.
    ///
    /// Two intakes in the same millisecond would otherwise share an
    /// invoice number.
    pub fn allocate(
        prefix: &str,
        now: DateTime<Utc>,
        sales: &[Sale],
        invoices: &[Invoice],
        notifications: &[Notification],
    ) -> Self {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = OrderIdentity::at_millis(prefix, millis);
            let taken = sales
                .iter()
                .any(|s| s.id == candidate.sale_id || s.invoice_number == candidate.invoice_number)
                || invoices
                    .iter()
                    .any(|i| i.invoice_number == candidate.invoice_number)
                || notifications
                    .iter()
                    .any(|n| n.id == candidate.notification_id);

            if !taken {
                return candidate;
            }
            millis += 1;
        }
    }

    /// The instant encoded in the identity.
    pub fn placed_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.sale_id)
            .single()
            .unwrap_or_else(Utc::now)
    }

    fn at_millis(prefix: &str, millis: i64) -> Self {
        OrderIdentity {
            sale_id: millis,
            invoice_number: format!("{}-{}", prefix, millis),
            notification_id: millis,
        }
    }
}

// =============================================================================
// Draft and placement
// =============================================================================

/// A validated order that has not been placed yet.
///
/// Holds its own copies of the lines and the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub lines: Vec<CartLine>,
    pub customer: CustomerProfile,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
}

impl OrderDraft {
    /// Validates the inputs and computes totals.
    ///
    /// ## When This Fails
    /// - `EmptyCart` when there are no lines
    /// - `Validation` when the name or phone is blank, a delivery order has
    ///   no address, or a line quantity is not positive
    pub fn prepare(
        lines: &[CartLine],
        customer: &CustomerProfile,
        payment_method: PaymentMethod,
    ) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_customer_profile(customer)?;
        for line in lines {
            validate_quantity(line.quantity)?;
        }

        let lines = lines.to_vec();
        let totals = OrderTotals::compute(&lines, customer.order_type);

        Ok(OrderDraft {
            lines,
            customer: customer.clone(),
            payment_method,
            totals,
        })
    }

    pub fn order_type(&self) -> OrderType {
        self.customer.order_type
    }

    /// Builds the three records of a placed order.
    pub fn place(self, identity: OrderIdentity, placed_at: DateTime<Utc>) -> PlacedOrder {
        let totals = self.totals;

        let invoice = Invoice {
            invoice_number: identity.invoice_number.clone(),
            date: placed_at,
            customer: self.customer.clone(),
            order_type: self.customer.order_type,
            items: self.lines.iter().map(InvoiceItem::from).collect(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            delivery_fee: totals.delivery_fee,
            total: totals.total,
            payment_method: self.payment_method,
        };

        let notification = Notification {
            id: identity.notification_id,
            kind: Notification::PAYMENT_CONFIRMATION.to_string(),
            message: format!(
                "Orden pendiente de confirmación de pago - {}",
                self.payment_method.display_name()
            ),
            customer: self.customer.customer_name.clone(),
            total: totals.total,
            date: placed_at,
            read: false,
        };

        let sale = Sale {
            id: identity.sale_id,
            invoice_number: identity.invoice_number,
            date: placed_at,
            order_type: self.customer.order_type,
            customer: self.customer,
            items: self.lines,
            subtotal: totals.subtotal,
            tax: totals.tax,
            delivery_fee: totals.delivery_fee,
            total: totals.total,
            payment_method: self.payment_method,
            status: OrderStatus::Pending,
        };

        PlacedOrder {
            sale,
            invoice,
            notification,
        }
    }
}

/// The records produced by one intake.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub sale: Sale,
    pub invoice: Invoice,
    pub notification: Notification,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductCategory};

    fn burger() -> Product {
        Product {
            id: 1,
            name: "Burger".to_string(),
            price: Money::from_pesos(15_000),
            category: ProductCategory::Food,
            subcategory: Some("hamburguesas".to_string()),
            image: String::new(),
            description: String::new(),
            specifications: String::new(),
        }
    }

    fn profile(order_type: OrderType) -> CustomerProfile {
        CustomerProfile {
            order_type,
            customer_name: "Ana".to_string(),
            customer_phone: "3001234567".to_string(),
            address: match order_type {
                OrderType::Delivery => Some("Calle 10 # 5-20".to_string()),
                _ => None,
            },
            address_details: None,
            table_number: None,
            notes: None,
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_burger_delivery_scenario() {
        let lines = vec![CartLine::from_product(&burger(), 2)];
        let draft =
            OrderDraft::prepare(&lines, &profile(OrderType::Delivery), PaymentMethod::Cash)
                .unwrap();

        assert_eq!(draft.totals.subtotal, Money::from_pesos(30_000));
        assert_eq!(draft.totals.tax, Money::from_pesos(5_700));
        assert_eq!(draft.totals.delivery_fee, Money::from_pesos(3_000));
        assert_eq!(draft.totals.total, Money::from_pesos(38_700));

        let now = at(1_700_000_000_123);
        let placed = draft.place(OrderIdentity::from_clock("TCB", now), now);

        assert_eq!(placed.sale.status, OrderStatus::Pending);
        assert_eq!(placed.sale.invoice_number, "TCB-1700000000123");
        assert_eq!(placed.invoice.invoice_number, placed.sale.invoice_number);
        assert_eq!(placed.invoice.total, placed.sale.total);
        assert_eq!(placed.invoice.tax, placed.sale.tax);
        assert_eq!(placed.invoice.subtotal, placed.sale.subtotal);
        assert_eq!(placed.invoice.delivery_fee, placed.sale.delivery_fee);
        assert_eq!(placed.invoice.items[0].total, Money::from_pesos(30_000));

        assert_eq!(placed.notification.total, Money::from_pesos(38_700));
        assert_eq!(placed.notification.kind, "payment_confirmation");
        assert!(placed.notification.message.ends_with("Efectivo"));
        assert!(!placed.notification.read);
    }

    #[test]
    fn test_delivery_fee_only_for_delivery() {
        let lines = vec![CartLine::from_product(&burger(), 1)];
        for order_type in [OrderType::Pickup, OrderType::DineIn] {
            let totals = OrderTotals::compute(&lines, order_type);
            assert!(totals.delivery_fee.is_zero());
            assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
        let delivery = OrderTotals::compute(&lines, OrderType::Delivery);
        assert_eq!(delivery.delivery_fee, Money::from_pesos(3_000));
    }

    #[test]
    fn test_tax_is_exactly_nineteen_percent() {
        for (price, qty) in [(1, 1), (4_500, 3), (15_050, 1), (12_345, 7)] {
            let mut product = burger();
            product.price = Money::from_pesos(price);
            let totals = OrderTotals::compute(&[CartLine::from_product(&product, qty)], OrderType::Pickup);
            assert_eq!(totals.tax.centavos() * 100, totals.subtotal.centavos() * 19);
        }
    }

    #[test]
    fn test_prepare_rejects_without_producing_state() {
        let lines = vec![CartLine::from_product(&burger(), 1)];

        assert!(matches!(
            OrderDraft::prepare(&[], &profile(OrderType::Pickup), PaymentMethod::Nequi),
            Err(CoreError::EmptyCart)
        ));

        let mut nameless = profile(OrderType::Pickup);
        nameless.customer_name = "  ".to_string();
        assert!(matches!(
            OrderDraft::prepare(&lines, &nameless, PaymentMethod::Nequi),
            Err(CoreError::Validation(_))
        ));

        let mut no_address = profile(OrderType::Delivery);
        no_address.address = Some(String::new());
        assert!(OrderDraft::prepare(&lines, &no_address, PaymentMethod::Nequi).is_err());
    }

    #[test]
    fn test_draft_holds_copies() {
        let mut lines = vec![CartLine::from_product(&burger(), 1)];
        let mut customer = profile(OrderType::Pickup);
        let draft = OrderDraft::prepare(&lines, &customer, PaymentMethod::Nequi).unwrap();

        lines[0].quantity = 50;
        customer.customer_name = "Changed".to_string();

        assert_eq!(draft.lines[0].quantity, 1);
        assert_eq!(draft.customer.customer_name, "Ana");
    }

    #[test]
    fn test_allocate_skips_taken_millis() {
        let lines = vec![CartLine::from_product(&burger(), 1)];
        let now = at(1_700_000_000_000);
        let first = OrderDraft::prepare(&lines, &profile(OrderType::Pickup), PaymentMethod::Nequi)
            .unwrap()
            .place(OrderIdentity::from_clock("TCB", now), now);

        let identity = OrderIdentity::allocate(
            "TCB",
            now,
            &[first.sale.clone()],
            &[first.invoice.clone()],
            &[first.notification.clone()],
        );

        assert_eq!(identity.sale_id, 1_700_000_000_001);
        assert_eq!(identity.invoice_number, "TCB-1700000000001");
        assert_eq!(identity.placed_at(), at(1_700_000_000_001));
    }
}
