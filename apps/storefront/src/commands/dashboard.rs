//! # Dashboard Command
//!
//! Figures for the admin dashboard cards. "Today" is the restaurant's local
//! day.

use chrono::Local;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use tcb_core::DashboardSummary;

pub async fn dashboard_summary(db: &DbState) -> Result<DashboardSummary, ApiError> {
    debug!("dashboard_summary command");
    let db = db.inner();

    let sales = db.orders().list().await?;
    let notifications = db.notifications().list().await?;
    let products = db.catalog().list().await?;
    let promotions = db.catalog().list_promotions().await?;
    let cash_base = db.settings().cash_base().await?;

    Ok(DashboardSummary::build(
        &sales,
        &notifications,
        &products,
        &promotions,
        cash_base,
        Local::now().date_naive(),
        &Local,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::orders::confirm_payment;
    use crate::testing::{place_pickup_order, storefront};
    use tcb_core::Money;

    #[tokio::test]
    async fn test_summary_counts_todays_orders() {
        let (sf, _) = storefront().await;
        let first = place_pickup_order(&sf).await;
        let second = place_pickup_order(&sf).await;
        confirm_payment(&sf.db, &sf.config, sf.messenger(), first.id)
            .await
            .unwrap();

        let summary = dashboard_summary(&sf.db).await.unwrap();
        assert_eq!(summary.todays_sales, 2);
        assert_eq!(summary.todays_revenue, first.total + second.total);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(summary.unread_notifications, 2);
        assert_eq!(summary.active_promotions, 2);
        assert_eq!(summary.cash_base, Money::from_pesos(50_000));
        assert!(summary.product_count > 0);
    }
}
