use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::UserId,
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Follow {
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: NaiveDateTime,
}

impl Follow {
    /// Returns `true` if a new edge was created.
    #[tracing::instrument(skip(conn), name = "db.follows.insert")]
    pub async fn insert(
        conn: &mut Connection,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO "follows" (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, following_id) DO NOTHING"#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if the edge existed.
    #[tracing::instrument(skip(conn), name = "db.follows.delete")]
    pub async fn delete(
        conn: &mut Connection,
        follower_id: &UserId,
        following_id: &UserId,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"DELETE FROM "follows" WHERE follower_id = $1 AND following_id = $2"#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}
