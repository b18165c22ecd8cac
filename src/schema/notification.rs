use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use super::{profile::ActorSummary, post::PostSummary};
use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::{NotificationId, PostId, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
pub enum NotificationType {
    Like,
    Follow,
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    /// The recipient
    pub user_id: UserId,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: NotificationType,
    pub actor_id: UserId,
    pub post_id: Option<PostId>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

/// Notification about to be inserted. It is always unread and
/// stamped with the current time.
#[derive(Debug, Clone, Copy)]
pub struct NewNotification<'a> {
    pub recipient: &'a UserId,
    pub kind: NotificationType,
    pub actor: &'a UserId,
    pub post_id: Option<PostId>,
}

/// Notification joined with whoever caused it and the post it is
/// about, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    /// `None` if the actor has no profile.
    pub actor: Option<ActorSummary>,
    pub post: Option<PostSummary>,
}

impl<'r> FromRow<'r, PgRow> for NotificationView {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        let notification = Notification::from_row(row)?;

        let actor = match row.try_get::<Option<String>, _>("actor_username")? {
            Some(username) => Some(ActorSummary {
                id: notification.actor_id.clone(),
                username,
                display_name: row.try_get("actor_display_name")?,
                university: row.try_get("actor_university")?,
                avatar_url: row.try_get("actor_avatar_url")?,
            }),
            None => None,
        };

        let post = match (
            notification.post_id,
            row.try_get::<Option<String>, _>("post_title")?,
        ) {
            (Some(id), Some(title)) => Some(PostSummary {
                id,
                title,
                thumbnail_url: row.try_get("post_thumbnail_url")?,
            }),
            _ => None,
        };

        Ok(Self {
            notification,
            actor,
            post,
        })
    }
}

impl Notification {
    #[tracing::instrument(skip(conn), name = "db.notifications.insert")]
    pub async fn insert(conn: &mut Connection, new: NewNotification<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "notifications" (user_id, type, actor_id, post_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, type, actor_id, post_id, is_read, created_at"#,
        )
        .bind(new.recipient)
        .bind(new.kind)
        .bind(new.actor)
        .bind(new.post_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Newest first, ties broken by id.
    #[tracing::instrument(skip(conn), name = "db.notifications.list")]
    pub async fn list_for(
        conn: &mut Connection,
        user_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationView>> {
        sqlx::query_as::<_, NotificationView>(
            r#"SELECT n.id, n.user_id, n.type, n.actor_id, n.post_id, n.is_read, n.created_at,
                a.username AS actor_username,
                a.display_name AS actor_display_name,
                a.university AS actor_university,
                a.avatar_url AS actor_avatar_url,
                p.title AS post_title,
                p.thumbnail_url AS post_thumbnail_url
            FROM "notifications" n
            LEFT JOIN "profiles" a ON a.id = n.actor_id
            LEFT JOIN "posts" p ON p.id = n.post_id
            WHERE n.user_id = $1
            ORDER BY n.created_at DESC, n.id DESC
            LIMIT $2 OFFSET $3"#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.notifications.count_unread")]
    pub async fn count_unread(conn: &mut Connection, user_id: &UserId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "notifications" WHERE user_id = $1 AND is_read = FALSE"#,
        )
        .bind(user_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Returns `false` if `user_id` has no notification with this id.
    #[tracing::instrument(skip(conn), name = "db.notifications.mark_read")]
    pub async fn mark_read(
        conn: &mut Connection,
        id: NotificationId,
        user_id: &UserId,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"UPDATE "notifications" SET is_read = TRUE WHERE id = $1 AND user_id = $2"#,
        )
        .bind(id)
        .bind(user_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(conn), name = "db.notifications.mark_all_read")]
    pub async fn mark_all_read(conn: &mut Connection, user_id: &UserId) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE "notifications" SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE"#,
        )
        .bind(user_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(conn), name = "db.notifications.delete")]
    pub async fn delete(
        conn: &mut Connection,
        id: NotificationId,
        user_id: &UserId,
    ) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM "notifications" WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}
