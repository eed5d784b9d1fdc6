//! Dashboard notification records.

use std::sync::Arc;

use db::{
    models::notification::{CreateNotification, Notification, NotificationKind},
    store::{NotificationStore, StoreError},
};
use tracing::info;
use uuid::Uuid;

/// Writes and reads the per-user notification feed.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Append one notification to a user's feed.
    pub async fn record(
        &self,
        user_id: Uuid,
        dispute_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Notification, StoreError> {
        let notification = Notification::new(CreateNotification {
            user_id,
            dispute_id,
            kind: kind.clone(),
            title: title.to_string(),
            message: message.to_string(),
        });
        self.store.insert(notification.clone()).await?;
        info!(user_id = %user_id, dispute_id = %dispute_id, kind = %kind, "notification recorded");
        Ok(notification)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        self.store.list_for_user(user_id).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, StoreError> {
        self.store.mark_read(id).await
    }
}
