use serde::Serialize;
use sqlx::FromRow;

use crate::{
    database::{error::ErrorExt, Connection, Result},
    types::UserId,
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub university: Option<String>,
    pub avatar_url: Option<String>,
    pub total_likes_available: Option<i32>,
    pub total_likes_used: Option<i32>,
}

impl Profile {
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: None,
            university: None,
            avatar_url: None,
            total_likes_available: None,
            total_likes_used: None,
        }
    }

    #[must_use]
    pub fn like_budget(&self) -> LikeBudget {
        LikeBudget {
            total_likes_available: self.total_likes_available,
            total_likes_used: self.total_likes_used,
        }
    }

    #[must_use]
    pub fn summary(&self) -> ActorSummary {
        ActorSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            university: self.university.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

impl Profile {
    #[tracing::instrument(skip(conn), name = "db.profiles.like_budget")]
    pub async fn find_like_budget(
        conn: &mut Connection,
        id: &UserId,
    ) -> Result<Option<LikeBudget>> {
        sqlx::query_as::<_, LikeBudget>(
            r#"SELECT total_likes_available, total_likes_used FROM "profiles" WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.profiles.exists")]
    pub async fn exists(conn: &mut Connection, id: &UserId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS (SELECT 1 FROM "profiles" WHERE id = $1)"#)
            .bind(id)
            .fetch_one(conn)
            .await
            .into_db_error()
    }

    /// Uses up one like from the profile's budget. Returns `false`
    /// if nothing was left or the profile does not exist.
    #[tracing::instrument(skip(conn), name = "db.profiles.consume_like")]
    pub async fn consume_like(
        conn: &mut Connection,
        id: &UserId,
        default_available: i32,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"UPDATE "profiles"
            SET total_likes_used = COALESCE(total_likes_used, 0) + 1
            WHERE id = $1
            AND COALESCE(total_likes_used, 0) < COALESCE(total_likes_available, $2)"#,
        )
        .bind(id)
        .bind(default_available)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(conn), name = "db.profiles.restore_like")]
    pub async fn restore_like(conn: &mut Connection, id: &UserId) -> Result<()> {
        sqlx::query(
            r#"UPDATE "profiles"
            SET total_likes_used = GREATEST(COALESCE(total_likes_used, 0) - 1, 0)
            WHERE id = $1"#,
        )
        .bind(id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(())
    }
}

/// Raw budget columns of a profile. `None` means the column is
/// null and the configured default applies.
#[derive(Debug, Default, Clone, Copy, FromRow, PartialEq, Eq)]
pub struct LikeBudget {
    pub total_likes_available: Option<i32>,
    pub total_likes_used: Option<i32>,
}

impl LikeBudget {
    #[must_use]
    pub fn available(&self, default_available: i32) -> i32 {
        self.total_likes_available.unwrap_or(default_available)
    }

    #[must_use]
    pub fn used(&self) -> i32 {
        self.total_likes_used.unwrap_or_default()
    }

    #[must_use]
    pub fn has_remaining(&self, default_available: i32) -> bool {
        self.used() < self.available(default_available)
    }
}

/// Public summary of the user who caused a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorSummary {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub university: Option<String>,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_budget_uses_defaults() {
        let budget = LikeBudget::default();
        assert_eq!(budget.available(20), 20);
        assert_eq!(budget.used(), 0);
        assert!(budget.has_remaining(20));

        let spent = LikeBudget {
            total_likes_available: Some(3),
            total_likes_used: Some(3),
        };
        assert!(!spent.has_remaining(20));
    }
}
