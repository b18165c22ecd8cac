use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::{PostId, UserId},
};

/// One user's like on a post. A user can like a post at most once,
/// so `count` is always 1.
#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct Like {
    pub post_id: PostId,
    pub user_id: UserId,
    pub count: i32,
    pub created_at: NaiveDateTime,
}

impl Like {
    #[tracing::instrument(skip(conn), name = "db.likes.find")]
    pub async fn find(
        conn: &mut Connection,
        post_id: PostId,
        user_id: &UserId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT post_id, user_id, count, created_at FROM "likes"
            WHERE post_id = $1 AND user_id = $2"#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Inserts the like row. Returns `None` if the user already
    /// liked this post.
    #[tracing::instrument(skip(conn), name = "db.likes.insert")]
    pub async fn insert(
        conn: &mut Connection,
        post_id: PostId,
        user_id: &UserId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "likes" (post_id, user_id, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (post_id, user_id) DO NOTHING
            RETURNING post_id, user_id, count, created_at"#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.likes.delete")]
    pub async fn delete(
        conn: &mut Connection,
        post_id: PostId,
        user_id: &UserId,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"DELETE FROM "likes" WHERE post_id = $1 AND user_id = $2
            RETURNING post_id, user_id, count, created_at"#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
