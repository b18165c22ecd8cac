use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::PostId,
};

#[derive(Debug, Clone, Copy, FromRow, PartialEq, Eq)]
pub struct PostViewCount {
    pub post_id: PostId,
    pub view_count: i64,
}

impl PostViewCount {
    #[tracing::instrument(skip(conn), name = "db.post_views.find_many")]
    pub async fn find_many(conn: &mut Connection, post_ids: &[PostId]) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"SELECT post_id, view_count FROM "post_views" WHERE post_id = ANY($1)"#,
        )
        .bind(post_ids)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    /// Adds one view to the post and returns the new count.
    #[tracing::instrument(skip(conn), name = "db.post_views.increment")]
    pub async fn increment(conn: &mut Connection, post_id: PostId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO "post_views" (post_id, view_count) VALUES ($1, 1)
            ON CONFLICT (post_id)
            DO UPDATE SET view_count = "post_views".view_count + 1
            RETURNING view_count"#,
        )
        .bind(post_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }
}
