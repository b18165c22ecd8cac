//! Batched counters of many posts at once, for feeds and grids.
//!
//! Every batch is answered in one store call and the result holds
//! exactly one entry per distinct requested post, zero if the post
//! has no aggregate row. Empty batches never reach the store.
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::schema::LikePeriod;
use crate::types::PostId;
use crate::App;

fn zeroed(post_ids: &[PostId]) -> BTreeMap<PostId, i64> {
    post_ids.iter().map(|id| (*id, 0)).collect()
}

#[derive(Debug)]
pub struct GetLikeCountsForPosts {
    pub post_ids: Vec<PostId>,
    pub period: LikePeriod,
}

impl GetLikeCountsForPosts {
    #[tracing::instrument(skip(app), name = "services.aggregates.like_counts")]
    pub async fn perform(self, app: &App) -> Result<BTreeMap<PostId, i64>> {
        let mut counts = zeroed(&self.post_ids);
        if counts.is_empty() {
            return Ok(counts);
        }

        let post_ids = counts.keys().copied().collect::<Vec<_>>();
        for aggregate in app.store.like_aggregates(&post_ids).await? {
            if let Some(count) = counts.get_mut(&aggregate.post_id) {
                *count = aggregate.count_for(self.period);
            }
        }

        Ok(counts)
    }
}

#[derive(Debug)]
pub struct GetViewCountsForPosts {
    pub post_ids: Vec<PostId>,
}

impl GetViewCountsForPosts {
    #[tracing::instrument(skip(app), name = "services.aggregates.view_counts")]
    pub async fn perform(self, app: &App) -> Result<BTreeMap<PostId, i64>> {
        let mut counts = zeroed(&self.post_ids);
        if counts.is_empty() {
            return Ok(counts);
        }

        let post_ids = counts.keys().copied().collect::<Vec<_>>();
        for row in app.store.view_counts(&post_ids).await? {
            if let Some(count) = counts.get_mut(&row.post_id) {
                *count = row.view_count;
            }
        }

        Ok(counts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewRecorded {
    pub post_id: PostId,
    pub view_count: i64,
}

#[derive(Debug)]
pub struct RecordView {
    pub post_id: PostId,
}

impl RecordView {
    #[tracing::instrument(skip(app), name = "services.aggregates.record_view")]
    pub async fn perform(self, app: &App) -> Result<ViewRecorded> {
        let view_count = app.store.increment_view_count(self.post_id).await?;
        Ok(ViewRecorded {
            post_id: self.post_id,
            view_count,
        })
    }
}
