use serde::Serialize;

use crate::error::{ErrorKind, Result};
use crate::types::{NotificationId, UserId};
use crate::App;

/// Marks one of the caller's notifications as read. Marking a read
/// notification again is fine.
#[derive(Debug)]
pub struct MarkAsRead {
    pub id: NotificationId,
}

impl MarkAsRead {
    #[tracing::instrument(skip(app), name = "services.notifications.mark_read")]
    pub async fn perform(self, app: &App, user_id: &UserId) -> Result<()> {
        if !app.store.mark_notification_read(self.id, user_id).await? {
            return Err(ErrorKind::NotFound.into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkedAsRead {
    pub updated: u64,
}

#[derive(Debug)]
pub struct MarkAllAsRead;

impl MarkAllAsRead {
    #[tracing::instrument(skip(app), name = "services.notifications.mark_all_read")]
    pub async fn perform(self, app: &App, user_id: &UserId) -> Result<MarkedAsRead> {
        let updated = app.store.mark_all_notifications_read(user_id).await?;
        Ok(MarkedAsRead { updated })
    }
}
