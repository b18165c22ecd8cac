use super::LikeToggled;
use crate::error::{ErrorKind, Result};
use crate::types::{PostId, UserId};
use crate::App;

/// Removes the caller's like. Notifications already sent for the
/// like are kept.
#[derive(Debug)]
pub struct RemoveLike {
    pub post_id: PostId,
}

impl RemoveLike {
    #[tracing::instrument(skip(app), name = "services.likes.remove")]
    pub async fn perform(self, app: &App, actor: &UserId) -> Result<LikeToggled> {
        let deleted = app
            .store
            .delete_like(self.post_id, actor, app.budget_policy())
            .await?;

        if deleted.is_none() {
            return Err(ErrorKind::LikeNotFound.into());
        }

        Ok(LikeToggled {
            post_id: self.post_id,
            current_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::services::likes::{AddLike, CheckUserLike, GetUserLikeStats, LikeStatus};
    use crate::test_utils::{self, TestResultExt};
    use serde_json::json;

    #[tokio::test]
    async fn should_unlike_and_keep_notification() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        let result = RemoveLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert_eq!(result.current_count, 0);

        let status = CheckUserLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert_eq!(
            status,
            LikeStatus {
                is_liked: false,
                count: 0
            }
        );
        assert_eq!(store.notifications_for(&author).await.len(), 1);
    }

    #[tokio::test]
    async fn should_reject_missing_like() {
        let (app, store) = test_utils::build_test_app();
        let liker = test_utils::register(&store, "liker-456").await;

        let error = RemoveLike {
            post_id: PostId::new(789),
        }
        .perform(&app, &liker)
        .await
        .expect_error_json();
        assert_eq!(error["code"], json!("like_not_found"));
    }

    #[tokio::test]
    async fn should_restore_budget_on_unlike() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        RemoveLike { post_id: post }.perform(&app, &liker).await.unwrap();

        let stats = GetUserLikeStats { user_id: liker }.perform(&app).await.unwrap();
        assert_eq!(stats.used, 0);
        assert_eq!(stats.remaining, 20);
    }

    #[tokio::test]
    async fn should_keep_budget_spent_if_configured() {
        let (_, store) = test_utils::build_test_app();
        let mut cfg = config::Server::for_tests();
        cfg.likes.restore_budget_on_unlike = false;
        let app = App::with_store(cfg, store.clone());

        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        RemoveLike { post_id: post }.perform(&app, &liker).await.unwrap();

        let stats = GetUserLikeStats { user_id: liker }.perform(&app).await.unwrap();
        assert_eq!(stats.used, 1);
        assert_eq!(stats.remaining, 19);
    }
}
