//! # Lookup and Projections
//!
//! Read-only views over stored sales: the public order-status lookup and
//! the admin dashboard figures. Nothing here is cached; every figure is
//! recomputed from the records it is given.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::lifecycle::OrderStatus;
use crate::money::Money;
use crate::types::{Notification, OrderType, Product, Promotion, Sale};

// =============================================================================
// Order-status lookup
// =============================================================================

/// A customer's free-text order search.
///
/// ## Matching
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  A sale matches when ANY of these hold:                                 │
/// │                                                                         │
/// │  invoice_number  contains query   (case-insensitive)                    │
/// │  customer_phone  contains query                                         │
/// │  id.to_string()  ==       query                                         │
/// │                                                                         │
/// │  The first match in stored order wins.                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    text: String,
    lowered: String,
}

impl OrderQuery {
    /// Trims the input; a blank query is rejected.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::required("query"));
        }
        Ok(OrderQuery {
            text: text.to_string(),
            lowered: text.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, sale: &Sale) -> bool {
        sale.invoice_number.to_lowercase().contains(&self.lowered)
            || sale.customer.customer_phone.contains(&self.text)
            || sale.id.to_string() == self.text
    }

    /// First matching sale in stored order, or `None`.
    pub fn find<'a>(&self, sales: &'a [Sale]) -> Option<&'a Sale> {
        sales.iter().find(|s| self.matches(s))
    }
}

// =============================================================================
// Projections
// =============================================================================

/// Sales whose date falls on `day` in the given time zone.
pub fn sales_on<'a, Tz: TimeZone>(sales: &'a [Sale], day: NaiveDate, tz: &Tz) -> Vec<&'a Sale> {
    sales
        .iter()
        .filter(|s| s.date.with_timezone(tz).date_naive() == day)
        .collect()
}

/// Σ total of the sales placed on `day`.
pub fn revenue_on<Tz: TimeZone>(sales: &[Sale], day: NaiveDate, tz: &Tz) -> Money {
    sales_on(sales, day, tz).into_iter().map(|s| s.total).sum()
}

pub fn pending_count(sales: &[Sale]) -> usize {
    sales
        .iter()
        .filter(|s| s.status == OrderStatus::Pending)
        .count()
}

/// Sales of one order type (the tabs of the orders board).
pub fn orders_of_type(sales: &[Sale], order_type: OrderType) -> Vec<&Sale> {
    sales.iter().filter(|s| s.order_type == order_type).collect()
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Figures on the admin dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Number of sales placed today.
    pub todays_sales: usize,
    #[ts(type = "number")]
    pub todays_revenue: Money,
    pub pending_orders: usize,
    pub product_count: usize,
    pub active_promotions: usize,
    pub unread_notifications: usize,
    #[ts(type = "number")]
    pub cash_base: Money,
}

impl DashboardSummary {
    pub fn build<Tz: TimeZone>(
        sales: &[Sale],
        notifications: &[Notification],
        products: &[Product],
        promotions: &[Promotion],
        cash_base: Money,
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let todays = sales_on(sales, today, tz);

        DashboardSummary {
            todays_sales: todays.len(),
            todays_revenue: todays.iter().map(|s| s.total).sum(),
            pending_orders: pending_count(sales),
            product_count: products.len(),
            active_promotions: promotions.iter().filter(|p| p.is_active).count(),
            unread_notifications: unread_count(notifications),
            cash_base,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
