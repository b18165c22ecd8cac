use crate::error::{ErrorKind, Result};
use crate::types::{NotificationId, UserId};
use crate::App;

#[derive(Debug)]
pub struct DeleteNotification {
    pub id: NotificationId,
}

impl DeleteNotification {
    #[tracing::instrument(skip(app), name = "services.notifications.delete")]
    pub async fn perform(self, app: &App, user_id: &UserId) -> Result<()> {
        if !app.store.delete_notification(self.id, user_id).await? {
            return Err(ErrorKind::NotFound.into());
        }
        Ok(())
    }
}
