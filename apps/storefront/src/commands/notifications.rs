//! # Notification Commands
//!
//! Admin alerts raised at checkout.

use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use tcb_core::Notification;

pub async fn list_notifications(db: &DbState) -> Result<Vec<Notification>, ApiError> {
    debug!("list_notifications command");
    Ok(db.inner().notifications().list().await?)
}

pub async fn mark_notification_read(db: &DbState, id: i64) -> Result<Notification, ApiError> {
    debug!(id, "mark_notification_read command");
    Ok(db.inner().notifications().mark_read(id).await?)
}

/// Returns how many notifications changed.
pub async fn mark_all_notifications_read(db: &DbState) -> Result<usize, ApiError> {
    debug!("mark_all_notifications_read command");
    Ok(db.inner().notifications().mark_all_read().await?)
}

/// Badge count on the admin bell.
pub async fn unread_notification_count(db: &DbState) -> Result<usize, ApiError> {
    Ok(db.inner().notifications().unread_count().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{place_pickup_order, storefront};

    #[tokio::test]
    async fn test_checkout_raises_unread_notification() {
        let (sf, _) = storefront().await;
        let sale = place_pickup_order(&sf).await;

        assert_eq!(unread_notification_count(&sf.db).await.unwrap(), 1);
        let notifications = list_notifications(&sf.db).await.unwrap();
        assert_eq!(notifications[0].customer, sale.customer.customer_name);
        assert_eq!(notifications[0].kind, Notification::PAYMENT_CONFIRMATION);

        mark_notification_read(&sf.db, notifications[0].id).await.unwrap();
        assert_eq!(unread_notification_count(&sf.db).await.unwrap(), 0);
        assert_eq!(mark_all_notifications_read(&sf.db).await.unwrap(), 0);
    }
}
