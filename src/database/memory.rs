use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use error_stack::Report;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

use super::{BudgetPolicy, Error, InsertLike, Result, Store};
use crate::schema::{
    Like, LikeAggregate, LikeBudget, NewNotification, Notification, NotificationView, Post,
    PostViewCount, Profile,
};
use crate::types::{NotificationId, PostId, UserId};

/// [`Store`] that keeps every row in process memory.
///
/// Used by tests and by local development when `db.in_memory` is set.
/// It follows the same rules as the Postgres schema: one like per
/// user and post, no self follows and no self notifications.
///
/// Tests can make a single operation fail with [`MemoryStore::fail`]
/// and count trait calls with [`MemoryStore::calls`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    calls: AtomicU64,
}

#[derive(Debug, Default)]
struct State {
    profiles: HashMap<UserId, Profile>,
    posts: HashMap<PostId, Post>,
    likes: BTreeMap<(PostId, UserId), Like>,
    views: HashMap<PostId, i64>,
    follows: BTreeSet<(UserId, UserId)>,
    notifications: BTreeMap<NotificationId, Notification>,
    last_notification_id: u64,
    failures: HashMap<&'static str, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`Store`] calls made so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Makes every call of `operation` (a [`Store`] method name) fail
    /// with `message` until [`MemoryStore::clear_failures`] is called.
    pub async fn fail(&self, operation: &'static str, message: impl Into<String>) {
        self.state.lock().await.failures.insert(operation, message.into());
    }

    pub async fn clear_failures(&self) {
        self.state.lock().await.failures.clear();
    }

    pub async fn insert_profile(&self, profile: Profile) {
        let mut state = self.state.lock().await;
        state.profiles.insert(profile.id.clone(), profile);
    }

    pub async fn profile(&self, id: &UserId) -> Option<Profile> {
        self.state.lock().await.profiles.get(id).cloned()
    }

    pub async fn insert_post(&self, post: Post) {
        let mut state = self.state.lock().await;
        state.posts.insert(post.id, post);
    }

    /// Adds a like made at `created_at` without touching any budget.
    pub async fn insert_like_at(
        &self,
        post_id: PostId,
        user_id: UserId,
        created_at: NaiveDateTime,
    ) {
        let like = Like {
            post_id,
            user_id: user_id.clone(),
            count: 1,
            created_at,
        };
        let mut state = self.state.lock().await;
        state.likes.insert((post_id, user_id), like);
    }

    /// Adds `count` likes from generated users to the post.
    pub async fn seed_likes(&self, post_id: PostId, count: usize) {
        let now = Utc::now().naive_utc();
        for n in 0..count {
            let user_id = UserId::new(format!("seed-{post_id}-{n}"));
            self.insert_like_at(post_id, user_id, now).await;
        }
    }

    pub async fn like_rows(&self, post_id: PostId) -> usize {
        let state = self.state.lock().await;
        state.likes.keys().filter(|(id, ..)| *id == post_id).count()
    }

    /// Every notification addressed to `user_id`, oldest first.
    pub async fn notifications_for(&self, user_id: &UserId) -> Vec<Notification> {
        let state = self.state.lock().await;
        state
            .notifications
            .values()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn is_following(&self, follower_id: &UserId, following_id: &UserId) -> bool {
        let state = self.state.lock().await;
        state
            .follows
            .contains(&(follower_id.clone(), following_id.clone()))
    }

    async fn enter(&self, operation: &'static str) -> Result<MutexGuard<'_, State>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let state = self.state.lock().await;
        if let Some(message) = state.failures.get(operation) {
            return Err(Report::new(Error::Rejected(message.clone())));
        }
        Ok(state)
    }
}

impl State {
    fn aggregate(&self, post_id: PostId, now: NaiveDateTime) -> Option<LikeAggregate> {
        let mut aggregate = LikeAggregate::empty(post_id);
        for like in self.likes.values().filter(|like| like.post_id == post_id) {
            let age = now - like.created_at;
            if age <= chrono::Duration::days(1) {
                aggregate.daily_likes += 1;
            }
            if age <= chrono::Duration::days(7) {
                aggregate.weekly_likes += 1;
            }
            if age <= chrono::Duration::days(30) {
                aggregate.monthly_likes += 1;
            }
            aggregate.total_likes += 1;
        }
        (aggregate.total_likes > 0).then_some(aggregate)
    }

    fn view(&self, notification: &Notification) -> NotificationView {
        NotificationView {
            notification: notification.clone(),
            actor: self
                .profiles
                .get(&notification.actor_id)
                .map(Profile::summary),
            post: notification
                .post_id
                .and_then(|id| self.posts.get(&id))
                .map(Post::summary),
        }
    }
}

fn check_violation(constraint: &str, table: &str) -> Report<Error> {
    Report::new(Error::Rejected(format!(
        "new row for relation \"{table}\" violates check constraint \"{constraint}\""
    )))
}

#[async_trait]
impl Store for MemoryStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn find_like(&self, post_id: PostId, user_id: &UserId) -> Result<Option<Like>> {
        let state = self.enter("find_like").await?;
        Ok(state.likes.get(&(post_id, user_id.clone())).cloned())
    }

    async fn insert_like(
        &self,
        post_id: PostId,
        user_id: &UserId,
        policy: BudgetPolicy,
    ) -> Result<InsertLike> {
        let mut state = self.enter("insert_like").await?;
        let key = (post_id, user_id.clone());
        if state.likes.contains_key(&key) {
            return Ok(InsertLike::AlreadyLiked);
        }

        let Some(profile) = state.profiles.get_mut(user_id) else {
            return Ok(InsertLike::ProfileMissing);
        };

        let budget = profile.like_budget();
        if !budget.has_remaining(policy.default_available) {
            return Ok(InsertLike::BudgetExhausted);
        }
        profile.total_likes_used = Some(budget.used() + 1);

        let like = Like {
            post_id,
            user_id: user_id.clone(),
            count: 1,
            created_at: Utc::now().naive_utc(),
        };
        state.likes.insert(key, like.clone());

        Ok(InsertLike::Inserted(like))
    }

    async fn delete_like(
        &self,
        post_id: PostId,
        user_id: &UserId,
        policy: BudgetPolicy,
    ) -> Result<Option<Like>> {
        let mut state = self.enter("delete_like").await?;
        let like = state.likes.remove(&(post_id, user_id.clone()));

        if like.is_some() && policy.restore_on_unlike {
            if let Some(profile) = state.profiles.get_mut(user_id) {
                let used = profile.like_budget().used();
                profile.total_likes_used = Some((used - 1).max(0));
            }
        }

        Ok(like)
    }

    async fn like_aggregate(&self, post_id: PostId) -> Result<Option<LikeAggregate>> {
        let state = self.enter("like_aggregate").await?;
        Ok(state.aggregate(post_id, Utc::now().naive_utc()))
    }

    async fn like_aggregates(&self, post_ids: &[PostId]) -> Result<Vec<LikeAggregate>> {
        let state = self.enter("like_aggregates").await?;
        let now = Utc::now().naive_utc();
        let ids = post_ids.iter().copied().collect::<BTreeSet<_>>();
        Ok(ids
            .into_iter()
            .filter_map(|id| state.aggregate(id, now))
            .collect())
    }

    async fn view_counts(&self, post_ids: &[PostId]) -> Result<Vec<PostViewCount>> {
        let state = self.enter("view_counts").await?;
        let ids = post_ids.iter().copied().collect::<BTreeSet<_>>();
        Ok(ids
            .into_iter()
            .filter_map(|post_id| {
                state.views.get(&post_id).map(|view_count| PostViewCount {
                    post_id,
                    view_count: *view_count,
                })
            })
            .collect())
    }

    async fn increment_view_count(&self, post_id: PostId) -> Result<i64> {
        let mut state = self.enter("increment_view_count").await?;
        let count = state.views.entry(post_id).or_default();
        *count += 1;
        Ok(*count)
    }

    async fn like_budget(&self, user_id: &UserId) -> Result<Option<LikeBudget>> {
        let state = self.enter("like_budget").await?;
        Ok(state.profiles.get(user_id).map(Profile::like_budget))
    }

    async fn post_author(&self, post_id: PostId) -> Result<Option<UserId>> {
        let state = self.enter("post_author").await?;
        Ok(state.posts.get(&post_id).map(|post| post.author_id.clone()))
    }

    async fn insert_follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool> {
        let mut state = self.enter("insert_follow").await?;
        if follower_id == following_id {
            return Err(check_violation("follows_no_self_edge", "follows"));
        }
        Ok(state
            .follows
            .insert((follower_id.clone(), following_id.clone())))
    }

    async fn delete_follow(&self, follower_id: &UserId, following_id: &UserId) -> Result<bool> {
        let mut state = self.enter("delete_follow").await?;
        Ok(state
            .follows
            .remove(&(follower_id.clone(), following_id.clone())))
    }

    async fn insert_notification(&self, new: NewNotification<'_>) -> Result<Notification> {
        let mut state = self.enter("insert_notification").await?;
        if new.recipient == new.actor {
            return Err(check_violation("notifications_not_self", "notifications"));
        }

        state.last_notification_id += 1;
        let notification = Notification {
            id: NotificationId::new(state.last_notification_id),
            user_id: new.recipient.clone(),
            kind: new.kind,
            actor_id: new.actor.clone(),
            post_id: new.post_id,
            is_read: false,
            created_at: Utc::now().naive_utc(),
        };
        state
            .notifications
            .insert(notification.id, notification.clone());

        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>> {
        let state = self.enter("list_notifications").await?;

        let mut rows = state
            .notifications
            .values()
            .filter(|n| &n.user_id == user_id)
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or_default())
            .take(usize::try_from(limit).unwrap_or_default())
            .map(|n| state.view(n))
            .collect())
    }

    async fn count_unread_notifications(&self, user_id: &UserId) -> Result<i64> {
        let state = self.enter("count_unread_notifications").await?;
        let count = state
            .notifications
            .values()
            .filter(|n| &n.user_id == user_id && !n.is_read)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn mark_notification_read(
        &self,
        id: NotificationId,
        user_id: &UserId,
    ) -> Result<bool> {
        let mut state = self.enter("mark_notification_read").await?;
        match state.notifications.get_mut(&id) {
            Some(n) if &n.user_id == user_id => {
                n.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_notifications_read(&self, user_id: &UserId) -> Result<u64> {
        let mut state = self.enter("mark_all_notifications_read").await?;
        let mut updated = 0;
        for n in state.notifications.values_mut() {
            if &n.user_id == user_id && !n.is_read {
                n.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_notification(&self, id: NotificationId, user_id: &UserId) -> Result<bool> {
        let mut state = self.enter("delete_notification").await?;
        let owned = state
            .notifications
            .get(&id)
            .is_some_and(|n| &n.user_id == user_id);
        if owned {
            state.notifications.remove(&id);
        }
        Ok(owned)
    }
}
