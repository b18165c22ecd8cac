use super::LikeToggled;
use crate::database::InsertLike;
use crate::error::{ErrorKind, Result};
use crate::schema::NotificationType;
use crate::services::trigger;
use crate::types::{PostId, UserId};
use crate::App;

#[derive(Debug)]
pub struct AddLike {
    pub post_id: PostId,
}

impl AddLike {
    #[tracing::instrument(skip(app), name = "services.likes.add")]
    pub async fn perform(self, app: &App, actor: &UserId) -> Result<LikeToggled> {
        let outcome = app
            .store
            .insert_like(self.post_id, actor, app.budget_policy())
            .await?;

        let like = match outcome {
            InsertLike::Inserted(like) => like,
            InsertLike::AlreadyLiked => return Err(ErrorKind::AlreadyLiked.into()),
            InsertLike::BudgetExhausted => return Err(ErrorKind::LikeBudgetExhausted.into()),
            InsertLike::ProfileMissing => return Err(ErrorKind::ProfileNotFound.into()),
        };

        match app.store.post_author(self.post_id).await {
            Ok(Some(author)) => {
                trigger::notify(
                    app,
                    &author,
                    NotificationType::Like,
                    actor,
                    Some(self.post_id),
                )
                .await;
            }
            Ok(None) => tracing::debug!("post has no author, not notifying anyone"),
            Err(error) => tracing::warn!(?error, "failed to look up post author"),
        }

        Ok(LikeToggled {
            post_id: self.post_id,
            current_count: like.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Profile;
    use crate::services::likes::{CheckUserLike, GetUserLikeStats};
    use crate::services::notifications::GetUnreadCount;
    use crate::test_utils::{self, TestResultExt};
    use serde_json::json;

    #[tokio::test]
    async fn should_like_post_and_notify_author() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        let result = AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert_eq!(result.current_count, 1);

        let notifications = store.notifications_for(&author).await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationType::Like);
        assert_eq!(notifications[0].actor_id, liker);
        assert_eq!(notifications[0].post_id, Some(post));
        assert!(!notifications[0].is_read);

        let unread = GetUnreadCount.perform(&app, &author).await.unwrap();
        assert_eq!(unread, 1);
    }

    #[tokio::test]
    async fn should_reject_second_like() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        let error = AddLike { post_id: post }
            .perform(&app, &liker)
            .await
            .expect_error_json();

        assert_eq!(error["code"], json!("already_liked"));
        assert_eq!(store.like_rows(post).await, 1);
        // only the first like notifies
        assert_eq!(store.notifications_for(&author).await.len(), 1);

        let stats = GetUserLikeStats { user_id: liker }.perform(&app).await.unwrap();
        assert_eq!(stats.used, 1);
    }

    #[tokio::test]
    async fn should_not_notify_self_like() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let post = test_utils::publish(&store, 789, &author).await;

        AddLike { post_id: post }.perform(&app, &author).await.unwrap();
        assert!(store.notifications_for(&author).await.is_empty());
    }

    #[tokio::test]
    async fn should_reject_like_without_budget() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;

        for id in 1..=20 {
            let post = test_utils::publish(&store, id, &author).await;
            AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        }

        let post = test_utils::publish(&store, 21, &author).await;
        let error = AddLike { post_id: post }
            .perform(&app, &liker)
            .await
            .expect_error_json();

        assert_eq!(error["code"], json!("like_budget_exhausted"));
        assert_eq!(store.like_rows(post).await, 0);
        assert_eq!(store.notifications_for(&author).await.len(), 20);
    }

    #[tokio::test]
    async fn should_use_profile_budget() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = UserId::new("liker-456");
        store
            .insert_profile(Profile {
                total_likes_available: Some(1),
                ..Profile::new(liker.clone(), "liker")
            })
            .await;

        let first = test_utils::publish(&store, 1, &author).await;
        let second = test_utils::publish(&store, 2, &author).await;

        AddLike { post_id: first }.perform(&app, &liker).await.unwrap();
        let error = AddLike { post_id: second }
            .perform(&app, &liker)
            .await
            .expect_error_json();
        assert_eq!(error["code"], json!("like_budget_exhausted"));
    }

    #[tokio::test]
    async fn should_reject_without_profile() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let post = test_utils::publish(&store, 789, &author).await;

        let error = AddLike { post_id: post }
            .perform(&app, &UserId::new("ghost"))
            .await
            .expect_error_json();
        assert_eq!(error["code"], json!("profile_not_found"));
    }

    #[tokio::test]
    async fn should_pass_storage_message_through() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        store.fail("insert_like", "connection reset by peer").await;
        let error = AddLike { post_id: post }
            .perform(&app, &liker)
            .await
            .expect_error_json();

        assert_eq!(
            error,
            json!({ "code": "storage", "message": "connection reset by peer" })
        );

        store.clear_failures().await;
        assert!(store.notifications_for(&author).await.is_empty());

        let status = CheckUserLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert!(!status.is_liked);
    }

    #[tokio::test]
    async fn should_keep_like_if_notification_fails() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        store.fail("insert_notification", "notifications are down").await;
        let result = AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert_eq!(result.current_count, 1);
        assert_eq!(store.like_rows(post).await, 1);

        store.clear_failures().await;
        assert!(store.notifications_for(&author).await.is_empty());
    }
}
