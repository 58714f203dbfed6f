//! # Notification Repository
//!
//! Admin alerts raised at intake. Only the read flag ever changes.

use tracing::debug;

use crate::collection::Collection;
use crate::error::{DbError, DbResult};
use crate::store::{keys, KvStore};
use tcb_core::query::unread_count;
use tcb_core::Notification;

pub(crate) const NOTIFICATIONS: Collection<Notification> = Collection::new(keys::NOTIFICATIONS);

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    store: KvStore,
}

impl NotificationRepository {
    pub fn new(store: KvStore) -> Self {
        NotificationRepository { store }
    }

    /// Every notification, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Notification>> {
        NOTIFICATIONS.load(&self.store).await
    }

    pub async fn unread(&self) -> DbResult<Vec<Notification>> {
        let mut notifications = self.list().await?;
        notifications.retain(|n| !n.read);
        Ok(notifications)
    }

    pub async fn unread_count(&self) -> DbResult<usize> {
        Ok(unread_count(&self.list().await?))
    }

    /// Marks one notification read. Marking it twice is harmless.
    pub async fn mark_read(&self, id: i64) -> DbResult<Notification> {
        let _guard = self.store.lock().await;
        let mut notifications = NOTIFICATIONS.load(&self.store).await?;

        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| DbError::not_found("Notification", id.to_string()))?;
        notification.read = true;
        let updated = notification.clone();

        debug!(id, "Notification marked read");
        NOTIFICATIONS.save(&self.store, &notifications).await?;
        Ok(updated)
    }

    /// Marks every notification read; returns how many changed.
    pub async fn mark_all_read(&self) -> DbResult<usize> {
        let _guard = self.store.lock().await;
        let mut notifications = NOTIFICATIONS.load(&self.store).await?;

        let mut changed = 0;
        for notification in notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }

        if changed > 0 {
            debug!(changed, "Notifications marked read");
            NOTIFICATIONS.save(&self.store, &notifications).await?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use tcb_core::Money;

    fn notification(id: i64) -> Notification {
        Notification {
            id,
            kind: Notification::PAYMENT_CONFIRMATION.to_string(),
            message: "Orden pendiente de confirmación de pago - Nequi".to_string(),
            customer: "Ana".to_string(),
            total: Money::from_pesos(38_700),
            date: Utc.timestamp_millis_opt(id).unwrap(),
            read: false,
        }
    }

    #[tokio::test]
    async fn test_read_tracking() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.store();
        NOTIFICATIONS
            .save(&store, &[notification(1), notification(2), notification(3)])
            .await
            .unwrap();

        let repo = db.notifications();
        assert_eq!(repo.unread_count().await.unwrap(), 3);

        assert!(repo.mark_read(2).await.unwrap().read);
        assert!(repo.mark_read(2).await.unwrap().read);
        assert_eq!(repo.unread().await.unwrap().len(), 2);

        assert_eq!(repo.mark_all_read().await.unwrap(), 2);
        assert_eq!(repo.mark_all_read().await.unwrap(), 0);
        assert_eq!(repo.unread_count().await.unwrap(), 0);
        assert_eq!(repo.list().await.unwrap().len(), 3);

        assert!(matches!(
            repo.mark_read(99).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
