use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{GetNotifications, GetUnreadCount};
use crate::error::Result;
use crate::schema::NotificationView;
use crate::types::UserId;
use crate::App;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSnapshot {
    pub unread_count: i64,
    /// First page of notifications, newest first.
    pub recent: Vec<NotificationView>,
}

impl NotificationSnapshot {
    #[tracing::instrument(skip(app), name = "services.notifications.snapshot")]
    async fn fetch(app: &App, user_id: &UserId) -> Result<Self> {
        let unread_count = GetUnreadCount.perform(app, user_id).await?;
        let recent = GetNotifications::default().perform(app, user_id).await?;
        Ok(Self {
            unread_count,
            recent,
        })
    }
}

/// Keeps the unread count and the latest notifications of a user
/// up to date in the background.
///
/// Snapshots are refreshed on every tick of the interval and on
/// [`NotificationPoller::refresh`]. A failed refresh keeps the
/// previous snapshot. The background task stops when the poller
/// is dropped.
#[derive(Debug)]
pub struct NotificationPoller {
    refresh: Arc<Notify>,
    snapshot: watch::Receiver<NotificationSnapshot>,
    task: JoinHandle<()>,
}

impl NotificationPoller {
    /// Polls every `notifications.poll_interval_secs`.
    #[must_use]
    pub fn spawn(app: App, user_id: UserId) -> Self {
        let interval = app.config.notifications.poll_interval();
        Self::spawn_with_interval(app, user_id, interval)
    }

    #[must_use]
    pub fn spawn_with_interval(app: App, user_id: UserId, interval: Duration) -> Self {
        let (sender, snapshot) = watch::channel(NotificationSnapshot::default());
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(poll(app, user_id, interval, refresh.clone(), sender));

        Self {
            refresh,
            snapshot,
            task,
        }
    }

    /// Refreshes right away instead of waiting for the next tick.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    #[must_use]
    pub fn latest(&self) -> NotificationSnapshot {
        self.snapshot.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NotificationSnapshot> {
        self.snapshot.clone()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[tracing::instrument(skip(app, refresh, sender), name = "services.notifications.poller")]
async fn poll(
    app: App,
    user_id: UserId,
    interval: Duration,
    refresh: Arc<Notify>,
    sender: watch::Sender<NotificationSnapshot>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = refresh.notified() => {}
        }

        match NotificationSnapshot::fetch(&app, &user_id).await {
            Ok(snapshot) => {
                sender.send_replace(snapshot);
            }
            Err(error) => tracing::warn!(?error, "failed to refresh notifications"),
        }
    }
}
