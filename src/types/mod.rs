pub mod id;
pub mod user_id;

pub use id::{NotificationId, PostId};
pub use user_id::UserId;
