use crate::error::Result;
use crate::schema::{NewNotification, Notification, NotificationType};
use crate::types::{PostId, UserId};
use crate::App;

/// Creates an unread notification for `recipient`. Nothing is
/// created if the actor is the recipient.
///
/// It does not check whether `post_id` makes sense for the kind.
#[derive(Debug)]
pub struct CreateNotification {
    pub recipient: UserId,
    pub kind: NotificationType,
    pub post_id: Option<PostId>,
}

impl CreateNotification {
    #[tracing::instrument(skip(app), name = "services.notifications.create")]
    pub async fn perform(self, app: &App, actor: &UserId) -> Result<Option<Notification>> {
        if self.recipient == *actor {
            tracing::debug!("actor is the recipient, skipping");
            return Ok(None);
        }

        let notification = app
            .store
            .insert_notification(NewNotification {
                recipient: &self.recipient,
                kind: self.kind,
                actor,
                post_id: self.post_id,
            })
            .await?;

        Ok(Some(notification))
    }
}
