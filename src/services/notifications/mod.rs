mod create;
mod delete;
mod list;
mod poller;
mod read;
mod unread;

pub use create::CreateNotification;
pub use delete::DeleteNotification;
pub use list::GetNotifications;
pub use poller::{NotificationPoller, NotificationSnapshot};
pub use read::{MarkAllAsRead, MarkAsRead, MarkedAsRead};
pub use unread::GetUnreadCount;
