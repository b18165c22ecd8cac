use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::{PostId, UserId},
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Post {
    #[must_use]
    pub fn new(id: PostId, author_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id,
            author_id,
            title: title.into(),
            thumbnail_url: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
        }
    }

    #[tracing::instrument(skip(conn), name = "db.posts.author")]
    pub async fn find_author(conn: &mut Connection, id: PostId) -> Result<Option<UserId>> {
        sqlx::query_scalar::<_, UserId>(r#"SELECT author_id FROM "posts" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    pub thumbnail_url: Option<String>,
}
