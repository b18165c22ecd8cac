use crate::config::Notifications;
use crate::error::{Error, Result};
use crate::schema::NotificationView;
use crate::types::UserId;
use crate::App;

/// A page of the caller's notifications, newest first.
#[derive(Debug, Default)]
pub struct GetNotifications {
    /// Clamped to `1..=100`. Defaults to `notifications.page_size`.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl GetNotifications {
    #[tracing::instrument(skip(app), name = "services.notifications.list")]
    pub async fn perform(self, app: &App, user_id: &UserId) -> Result<Vec<NotificationView>> {
        let offset = self.offset.unwrap_or_default();
        if offset < 0 {
            return Err(Error::invalid_request("offset must not be negative"));
        }

        let limit = self
            .limit
            .unwrap_or(app.config.notifications.page_size)
            .clamp(1, Notifications::MAX_PAGE_SIZE);

        let notifications = app
            .store
            .list_notifications(user_id, limit, offset)
            .await?;

        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NotificationType, Profile};
    use crate::services::notifications::CreateNotification;
    use crate::test_utils::{self, TestResultExt};
    use crate::types::PostId;
    use serde_json::json;

    async fn notify(app: &App, recipient: &UserId, actor: &UserId, post_id: Option<PostId>) {
        CreateNotification {
            recipient: recipient.clone(),
            kind: if post_id.is_some() {
                NotificationType::Like
            } else {
                NotificationType::Follow
            },
            post_id,
        }
        .perform(app, actor)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn should_list_newest_first_with_details() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = UserId::new("liker-456");
        store
            .insert_profile(Profile {
                display_name: Some(String::from("Liker")),
                university: Some(String::from("Art School")),
                ..Profile::new(liker.clone(), "liker")
            })
            .await;
        let post = test_utils::publish(&store, 789, &author).await;

        notify(&app, &author, &liker, Some(post)).await;
        notify(&app, &author, &liker, None).await;

        let page = GetNotifications::default()
            .perform(&app, &author)
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].notification.kind, NotificationType::Follow);
        assert_eq!(page[1].notification.kind, NotificationType::Like);

        let actor = page[1].actor.as_ref().unwrap();
        assert_eq!(actor.username, "liker");
        assert_eq!(actor.university.as_deref(), Some("Art School"));

        let post = page[1].post.as_ref().unwrap();
        assert_eq!(post.title, "Artwork #789");
        assert!(page[0].post.is_none());
    }

    #[tokio::test]
    async fn should_page_and_clamp() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        for n in 0..5 {
            notify(&app, &author, &UserId::new(format!("fan-{n}")), None).await;
        }

        let page = GetNotifications {
            limit: Some(2),
            offset: Some(1),
        }
        .perform(&app, &author)
        .await
        .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].notification.actor_id, UserId::new("fan-3"));

        let page = GetNotifications {
            limit: Some(0),
            offset: None,
        }
        .perform(&app, &author)
        .await
        .unwrap();
        assert_eq!(page.len(), 1);

        let empty = GetNotifications::default()
            .perform(&app, &UserId::new("nobody"))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn should_reject_negative_offset() {
        let (app, _) = test_utils::build_test_app();
        let error = GetNotifications {
            limit: None,
            offset: Some(-1),
        }
        .perform(&app, &UserId::new("author-789"))
        .await
        .expect_error_json();
        assert_eq!(error["code"], json!("invalid_request"));
    }
}
