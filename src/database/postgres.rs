use async_trait::async_trait;

use super::{
    migrations, BudgetPolicy, ErrorExt, ErrorExt2, InsertLike, Pool, PoolConnection, Result,
    Store, Transaction,
};
use crate::config;
use crate::schema::{
    Follow, Like, LikeAggregate, LikeBudget, NewNotification, Notification, NotificationView,
    Post, PostViewCount, Profile,
};
use crate::types::{NotificationId, PostId, UserId};

/// [`Store`] backed by Postgres, with an optional read replica.
#[derive(Debug, Clone)]
pub struct PgStore {
    primary: Pool,
    replica: Option<Pool>,
}

impl PgStore {
    #[tracing::instrument(skip_all, name = "db.connect_store")]
    pub async fn connect(cfg: &config::Database) -> Result<Self> {
        let primary = Pool::new(cfg, &cfg.primary).await?;
        let replica = if let Some(replica) = cfg.replica.as_ref() {
            Some(Pool::new(cfg, replica).await?)
        } else {
            None
        };

        if cfg.run_migrations && !primary.is_readonly() {
            migrations::run_pending(&primary).await?;
        }

        Ok(Self { primary, replica })
    }

    async fn db_write(&self) -> Result<Transaction<'static>> {
        self.primary.begin().await
    }

    async fn db_read(&self) -> Result<PoolConnection> {
        if let Some(replica) = self.replica.as_ref() {
            match replica.get().await {
                Ok(conn) => return Ok(conn),
                // fallback
                Err(err) if err.is_unhealthy() => {
                    tracing::warn!("replica pool is unhealthy, reading from primary");
                }
                Err(err) => return Err(err),
            }
        }
        self.primary.get().await
    }
}

#[async_trait]
impl Store for PgStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn find_like(&self, post_id: PostId, user_id: &UserId) -> Result<Option<Like>> {
        // a like is usually checked right after being toggled, replicas may lag
        let mut conn = self.primary.get().await?;
        Like::find(&mut conn, post_id, user_id).await
    }

    async fn insert_like(
        &self,
        post_id: PostId,
        user_id: &UserId,
        policy: BudgetPolicy,
    ) -> Result<InsertLike> {
        let mut tx = self.db_write().await?;

        let Some(like) = Like::insert(&mut tx, post_id, user_id).await? else {
            tx.rollback().await.into_db_error()?;
            return Ok(InsertLike::AlreadyLiked);
        };

        if !Profile::consume_like(&mut tx, user_id, policy.default_available).await? {
            let exists = Profile::exists(&mut tx, user_id).await?;
            tx.rollback().await.into_db_error()?;
            return Ok(if exists {
                InsertLike::BudgetExhausted
            } else {
                InsertLike::ProfileMissing
            });
        }

        tx.commit().await.into_db_error()?;
        Ok(InsertLike::Inserted(like))
    }

    async fn delete_like(
        &self,
        post_id: PostId,
        user_id: &UserId,
        policy: BudgetPolicy,
    ) -> Result<Option<Like>> {
        let mut tx = self.db_write().await?;

        let like = Like::delete(&mut tx, post_id, user_id).await?;
        if like.is_some() && policy.restore_on_unlike {
            Profile::restore_like(&mut tx, user_id).await?;
        }

        tx.commit().await.into_db_error()?;
        Ok(like)
    }

    async fn like_aggregate(&self, post_id: PostId) -> Result<Option<LikeAggregate>> {
        let mut conn = self.db_read().await?;
        LikeAggregate::find(&mut conn, post_id).await
    }

    async fn like_aggregates(&self, post_ids: &[PostId]) -> Result<Vec<LikeAggregate>> {
        let mut conn = self.db_read().await?;
        LikeAggregate::find_many(&mut conn, post_ids).await
    }

    async fn view_counts(&self, post_ids: &[PostId]) -> Result<Vec<PostViewCount>> {
        let mut conn = self.db_read().await?;
        PostViewCount::find_many(&mut conn, post_ids).await
    }

    async fn increment_view_count(&self, post_id: PostId) -> Result<i64> {
        let mut tx = self.db_write().await?;
        let count = PostViewCount::increment(&mut tx, post_id).await?;
        tx.commit().await.into_db_error()?;
        Ok(count)
    }

    async fn like_budget(&self, user_id: &UserId) -> Result<Option<LikeBudget>> {
        let mut conn = self.db_read().await?;
        Profile::find_like_budget(&mut conn, user_id).await
    }

    async fn post_author(&self, post_id: PostId) -> Result<Option<UserId>> {
        let mut conn = self.db_read().await?;
        Post::find_author(&mut conn, post_id).await
    }

    async fn insert_follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool> {
        let mut tx = self.db_write().await?;
        let created = Follow::insert(&mut tx, follower_id, following_id).await?;
        tx.commit().await.into_db_error()?;
        Ok(created)
    }

    async fn delete_follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool> {
        let mut tx = self.db_write().await?;
        let deleted = Follow::delete(&mut tx, follower_id, following_id).await?;
        tx.commit().await.into_db_error()?;
        Ok(deleted)
    }

    async fn insert_notification(&self, new: NewNotification<'_>) -> Result<Notification> {
        let mut tx = self.db_write().await?;
        let notification = Notification::insert(&mut tx, new).await?;
        tx.commit().await.into_db_error()?;
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>> {
        let mut conn = self.db_read().await?;
        Notification::list_for(&mut conn, user_id, limit, offset).await
    }

    async fn count_unread_notifications(&self, user_id: &UserId) -> Result<i64> {
        let mut conn = self.db_read().await?;
        Notification::count_unread(&mut conn, user_id).await
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
        user_id: &UserId,
    ) -> Result<bool> {
        let mut tx = self.db_write().await?;
        let found = Notification::mark_read(&mut tx, id, user_id).await?;
        tx.commit().await.into_db_error()?;
        Ok(found)
    }

    async fn mark_all_notifications_read(&self, user_id: &UserId) -> Result<u64> {
        let mut tx = self.db_write().await?;
        let updated = Notification::mark_all_read(&mut tx, user_id).await?;
        tx.commit().await.into_db_error()?;
        Ok(updated)
    }

    async fn delete_notification(&self, id: NotificationId, user_id: &UserId) -> Result<bool> {
        let mut tx = self.db_write().await?;
        let deleted = Notification::delete(&mut tx, id, user_id).await?;
        tx.commit().await.into_db_error()?;
        Ok(deleted)
    }
}

#[cfg(test)]
impl PgStore {
    pub(crate) fn from_pool(pool: sqlx::PgPool) -> Self {
        Self {
            primary: Pool::from_sqlx(pool),
            replica: None,
        }
    }
}
