use serde::Serialize;

use crate::types::PostId;

mod add;
mod check;
mod counts;
mod remove;
mod stats;

pub use add::AddLike;
pub use check::{CheckUserLike, LikeStatus};
pub use counts::{GetLikeCount, GetLikeCountsByPeriod};
pub use remove::RemoveLike;
pub use stats::{GetUserLikeStats, LikeStats};

/// Result of adding or removing a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeToggled {
    pub post_id: PostId,
    /// The caller's like count on the post after the change, 1 or 0.
    pub current_count: i32,
}
