use crate::schema::NotificationType;
use crate::services::notifications::CreateNotification;
use crate::types::{PostId, UserId};
use crate::App;

/// Tells `recipient` that `actor` did something. Must only be called
/// after the action itself is committed.
///
/// The action already succeeded at this point, so failures are
/// logged and swallowed.
#[tracing::instrument(skip(app), name = "services.trigger.notify")]
pub async fn notify(
    app: &App,
    recipient: &UserId,
    kind: NotificationType,
    actor: &UserId,
    post_id: Option<PostId>,
) {
    let request = CreateNotification {
        recipient: recipient.clone(),
        kind,
        post_id,
    };

    if let Err(error) = request.perform(app, actor).await {
        tracing::warn!(?error, "failed to create notification");
    }
}
