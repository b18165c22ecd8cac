use serde::Serialize;

use crate::error::Result;
use crate::types::{PostId, UserId};
use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub is_liked: bool,
    pub count: i32,
}

#[derive(Debug)]
pub struct CheckUserLike {
    pub post_id: PostId,
}

impl CheckUserLike {
    #[tracing::instrument(skip(app), name = "services.likes.check")]
    pub async fn perform(self, app: &App, user_id: &UserId) -> Result<LikeStatus> {
        let like = app.store.find_like(self.post_id, user_id).await?;
        Ok(LikeStatus {
            is_liked: like.is_some(),
            count: like.map_or(0, |like| like.count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::likes::AddLike;
    use crate::test_utils::{self, TestResultExt};
    use serde_json::json;

    #[tokio::test]
    async fn should_report_like() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        let post = test_utils::publish(&store, 789, &author).await;

        let status = CheckUserLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert!(!status.is_liked);
        assert_eq!(status.count, 0);

        AddLike { post_id: post }.perform(&app, &liker).await.unwrap();
        let status = CheckUserLike { post_id: post }.perform(&app, &liker).await.unwrap();
        assert!(status.is_liked);
        assert_eq!(status.count, 1);
    }

    #[tokio::test]
    async fn should_fail_on_storage_error() {
        let (app, store) = test_utils::build_test_app();
        store.fail("find_like", "permission denied").await;

        let error = CheckUserLike {
            post_id: PostId::new(1),
        }
        .perform(&app, &UserId::new("liker-456"))
        .await
        .expect_error_json();
        assert_eq!(error["code"], json!("storage"));
        assert_eq!(error["message"], json!("permission denied"));
    }
}
