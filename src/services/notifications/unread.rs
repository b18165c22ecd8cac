use crate::error::Result;
use crate::types::UserId;
use crate::App;

#[derive(Debug)]
pub struct GetUnreadCount;

impl GetUnreadCount {
    #[tracing::instrument(skip(app), name = "services.notifications.unread_count")]
    pub async fn perform(self, app: &App, user_id: &UserId) -> Result<i64> {
        let count = app.store.count_unread_notifications(user_id).await?;
        Ok(count)
    }
}
