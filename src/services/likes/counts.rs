use crate::error::Result;
use crate::schema::LikeCounts;
use crate::types::PostId;
use crate::App;

/// Total number of likes of a post.
#[derive(Debug)]
pub struct GetLikeCount {
    pub post_id: PostId,
}

impl GetLikeCount {
    #[tracing::instrument(skip(app), name = "services.likes.count")]
    pub async fn perform(self, app: &App) -> Result<i64> {
        let aggregate = app.store.like_aggregate(self.post_id).await?;
        Ok(aggregate.map_or(0, |v| v.total_likes))
    }
}

#[derive(Debug)]
pub struct GetLikeCountsByPeriod {
    pub post_id: PostId,
}

impl GetLikeCountsByPeriod {
    #[tracing::instrument(skip(app), name = "services.likes.counts_by_period")]
    pub async fn perform(self, app: &App) -> Result<LikeCounts> {
        let aggregate = app.store.like_aggregate(self.post_id).await?;
        Ok(aggregate.map(LikeCounts::from).unwrap_or_default())
    }
}
