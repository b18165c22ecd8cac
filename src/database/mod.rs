use async_trait::async_trait;

use crate::schema::{
    Like, LikeAggregate, LikeBudget, NewNotification, Notification, NotificationView,
    PostViewCount,
};
use crate::types::{NotificationId, PostId, UserId};

pub mod error;
mod memory;
mod migrations;
mod pool;
mod postgres;

pub use error::{Error, ErrorExt, ErrorExt2, Result};
pub use memory::MemoryStore;
pub use pool::Pool;
pub use postgres::PgStore;

pub type Transaction<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;

/// How likes are charged against a profile's like budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPolicy {
    /// Budget of profiles whose `total_likes_available` is null.
    pub default_available: i32,
    /// Gives the like back to the budget once it is removed.
    pub restore_on_unlike: bool,
}

/// Outcome of [`Store::insert_like`]. Nothing is written unless it
/// is [`InsertLike::Inserted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertLike {
    Inserted(Like),
    AlreadyLiked,
    BudgetExhausted,
    ProfileMissing,
}

/// Every persistent operation the services need.
///
/// Each method is one logical round trip; operations writing more
/// than one row are atomic.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Short name of the backend, used in logs.
    fn kind(&self) -> &'static str;

    async fn find_like(&self, post_id: PostId, user_id: &UserId) -> Result<Option<Like>>;

    /// Inserts a like and charges one unit of the liker's budget.
    async fn insert_like(
        &self,
        post_id: PostId,
        user_id: &UserId,
        policy: BudgetPolicy,
    ) -> Result<InsertLike>;

    /// Returns the deleted like, `None` if there was nothing to delete.
    async fn delete_like(
        &self,
        post_id: PostId,
        user_id: &UserId,
        policy: BudgetPolicy,
    ) -> Result<Option<Like>>;

    async fn like_aggregate(&self, post_id: PostId) -> Result<Option<LikeAggregate>>;
    async fn like_aggregates(&self, post_ids: &[PostId]) -> Result<Vec<LikeAggregate>>;

    async fn view_counts(&self, post_ids: &[PostId]) -> Result<Vec<PostViewCount>>;
    async fn increment_view_count(&self, post_id: PostId) -> Result<i64>;

    async fn like_budget(&self, user_id: &UserId) -> Result<Option<LikeBudget>>;
    async fn post_author(&self, post_id: PostId) -> Result<Option<UserId>>;

    /// Returns `true` if a new edge was created.
    async fn insert_follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool>;
    /// Returns `true` if the edge existed.
    async fn delete_follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool>;

    async fn insert_notification(&self, new: NewNotification<'_>) -> Result<Notification>;
    async fn list_notifications(
        &self,
        user_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>>;
    async fn count_unread_notifications(&self, user_id: &UserId) -> Result<i64>;
    async fn mark_notification_read(&self, id: NotificationId, user_id: &UserId)
        -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: &UserId) -> Result<u64>;
    async fn delete_notification(&self, id: NotificationId, user_id: &UserId) -> Result<bool>;
}
