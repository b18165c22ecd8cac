use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::PostId,
};

/// Row from the `post_like_counts` view.
#[derive(Debug, Clone, Copy, FromRow, PartialEq, Eq)]
pub struct LikeAggregate {
    pub post_id: PostId,
    pub daily_likes: i64,
    pub weekly_likes: i64,
    pub monthly_likes: i64,
    pub total_likes: i64,
}

impl LikeAggregate {
    #[must_use]
    pub fn empty(post_id: PostId) -> Self {
        Self {
            post_id,
            daily_likes: 0,
            weekly_likes: 0,
            monthly_likes: 0,
            total_likes: 0,
        }
    }

    #[must_use]
    pub fn count_for(&self, period: LikePeriod) -> i64 {
        match period {
            LikePeriod::Daily => self.daily_likes,
            LikePeriod::Weekly => self.weekly_likes,
            LikePeriod::Monthly => self.monthly_likes,
            LikePeriod::Total => self.total_likes,
        }
    }

    #[tracing::instrument(skip(conn), name = "db.like_counts.find")]
    pub async fn find(conn: &mut Connection, post_id: PostId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT post_id, daily_likes, weekly_likes, monthly_likes, total_likes
            FROM "post_like_counts" WHERE post_id = $1"#,
        )
        .bind(post_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Fetches every aggregate row of `post_ids` in one round trip.
    /// Posts without likes have no row.
    #[tracing::instrument(skip(conn), name = "db.like_counts.find_many")]
    pub async fn find_many(conn: &mut Connection, post_ids: &[PostId]) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT post_id, daily_likes, weekly_likes, monthly_likes, total_likes
            FROM "post_like_counts" WHERE post_id = ANY($1)"#,
        )
        .bind(post_ids)
        .fetch_all(conn)
        .await
        .into_db_error()
    }
}

/// Time window of a like count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikePeriod {
    Daily,
    Weekly,
    Monthly,
    #[default]
    Total,
}

/// Like counts of a single post over every period.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeCounts {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
    pub total: i64,
}

impl From<LikeAggregate> for LikeCounts {
    fn from(value: LikeAggregate) -> Self {
        Self {
            daily: value.daily_likes,
            weekly: value.weekly_likes,
            monthly: value.monthly_likes,
            total: value.total_likes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_for_period() {
        let aggregate = LikeAggregate {
            post_id: PostId::new(1),
            daily_likes: 1,
            weekly_likes: 2,
            monthly_likes: 3,
            total_likes: 4,
        };
        assert_eq!(aggregate.count_for(LikePeriod::Daily), 1);
        assert_eq!(aggregate.count_for(LikePeriod::Weekly), 2);
        assert_eq!(aggregate.count_for(LikePeriod::Monthly), 3);
        assert_eq!(aggregate.count_for(LikePeriod::Total), 4);
        assert_eq!(LikeAggregate::empty(PostId::new(1)).count_for(LikePeriod::Total), 0);
    }

    #[test]
    fn period_from_query() {
        let period: LikePeriod = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(period, LikePeriod::Weekly);
        assert_eq!(LikePeriod::default(), LikePeriod::Total);
    }
}
