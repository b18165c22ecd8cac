use crate::error::{Error, ErrorKind, Result};
use crate::schema::NotificationType;
use crate::services::trigger;
use crate::types::UserId;
use crate::App;

#[derive(Debug)]
pub struct FollowUser {
    pub target: UserId,
}

impl FollowUser {
    #[tracing::instrument(skip(app), name = "services.follows.follow")]
    pub async fn perform(self, app: &App, actor: &UserId) -> Result<()> {
        // The target user must not be themselves
        if *actor == self.target {
            return Err(Error::invalid_request("You cannot follow yourself"));
        }

        let created = app.store.insert_follow(actor, &self.target).await?;
        if created {
            trigger::notify(app, &self.target, NotificationType::Follow, actor, None).await;
        }

        Ok(())
    }
}

/// Notifications already sent for the follow are kept.
#[derive(Debug)]
pub struct UnfollowUser {
    pub target: UserId,
}

impl UnfollowUser {
    #[tracing::instrument(skip(app), name = "services.follows.unfollow")]
    pub async fn perform(self, app: &App, actor: &UserId) -> Result<()> {
        if !app.store.delete_follow(actor, &self.target).await? {
            return Err(ErrorKind::NotFound.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestResultExt};
    use serde_json::json;

    #[tokio::test]
    async fn should_not_follow_themselves() {
        let (app, store) = test_utils::build_test_app();
        let alice = test_utils::register(&store, "alice").await;

        let error = FollowUser {
            target: alice.clone(),
        }
        .perform(&app, &alice)
        .await
        .expect_error_json();

        assert_eq!(
            error,
            json!({ "code": "invalid_request", "message": "You cannot follow yourself" })
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn should_follow_and_notify_once() {
        let (app, store) = test_utils::build_test_app();
        let alice = test_utils::register(&store, "alice").await;
        let bob = test_utils::register(&store, "bob").await;

        FollowUser { target: bob.clone() }.perform(&app, &alice).await.unwrap();
        FollowUser { target: bob.clone() }.perform(&app, &alice).await.unwrap();

        assert!(store.is_following(&alice, &bob).await);
        let notifications = store.notifications_for(&bob).await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationType::Follow);
        assert_eq!(notifications[0].actor_id, alice);
        assert_eq!(notifications[0].post_id, None);
    }

    #[tokio::test]
    async fn should_unfollow_and_keep_notification() {
        let (app, store) = test_utils::build_test_app();
        let alice = test_utils::register(&store, "alice").await;
        let bob = test_utils::register(&store, "bob").await;

        FollowUser { target: bob.clone() }.perform(&app, &alice).await.unwrap();
        UnfollowUser { target: bob.clone() }.perform(&app, &alice).await.unwrap();

        assert!(!store.is_following(&alice, &bob).await);
        assert_eq!(store.notifications_for(&bob).await.len(), 1);

        let error = UnfollowUser { target: bob }
            .perform(&app, &alice)
            .await
            .expect_error_json();
        assert_eq!(error["code"], json!("not_found"));
    }
}
