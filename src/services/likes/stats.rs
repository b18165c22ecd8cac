use serde::Serialize;

use crate::error::Result;
use crate::types::UserId;
use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStats {
    pub available: i32,
    pub used: i32,
    pub remaining: i32,
}

/// Like budget of a user. Users without a profile get the default
/// budget.
#[derive(Debug)]
pub struct GetUserLikeStats {
    pub user_id: UserId,
}

impl GetUserLikeStats {
    #[tracing::instrument(skip(app), name = "services.likes.stats")]
    pub async fn perform(self, app: &App) -> Result<LikeStats> {
        let budget = app
            .store
            .like_budget(&self.user_id)
            .await?
            .unwrap_or_default();

        let available = budget.available(app.config.likes.default_available);
        let used = budget.used();

        Ok(LikeStats {
            available,
            used,
            remaining: available.saturating_sub(used).max(0),
        })
    }
}
