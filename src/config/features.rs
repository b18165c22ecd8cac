use serde::Deserialize;
use std::num::NonZeroU64;
use std::time::Duration;
use validator::Validate;

/// Like budget rules.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Likes {
    /// Allowance given to users whose profile has no
    /// `total_likes_available` value yet.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_LIKES_DEFAULT_AVAILABLE`
    #[serde(default = "Likes::default_available")]
    #[validate(range(min = 0, message = "Default like budget cannot be negative"))]
    pub default_available: i32,
    /// Gives one like back to the user's budget when they remove
    /// a like.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_LIKES_RESTORE_BUDGET_ON_UNLIKE`
    #[serde(default = "Likes::default_restore_budget_on_unlike")]
    pub restore_budget_on_unlike: bool,
}

impl Likes {
    pub const DEFAULT_AVAILABLE: i32 = 20;

    const fn default_available() -> i32 {
        Self::DEFAULT_AVAILABLE
    }

    const fn default_restore_budget_on_unlike() -> bool {
        true
    }
}

impl Default for Likes {
    fn default() -> Self {
        Self {
            default_available: Self::default_available(),
            restore_budget_on_unlike: Self::default_restore_budget_on_unlike(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notifications {
    /// How often a notification poller refreshes.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_NOTIFICATIONS_POLL_INTERVAL_SECS`
    #[serde(default = "Notifications::default_poll_interval_secs")]
    pub poll_interval_secs: NonZeroU64,
    /// Page size used when listing notifications without a limit.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_NOTIFICATIONS_PAGE_SIZE`
    #[serde(default = "Notifications::default_page_size")]
    pub page_size: i64,
}

impl Notifications {
    pub const DEFAULT_PAGE_SIZE: i64 = 20;
    pub const MAX_PAGE_SIZE: i64 = 100;
    const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

    const fn default_poll_interval_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_POLL_INTERVAL_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_POLL_INTERVAL_SECS is accidentally set to 0"),
        }
    }

    const fn default_page_size() -> i64 {
        Self::DEFAULT_PAGE_SIZE
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.get())
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            poll_interval_secs: Self::default_poll_interval_secs(),
            page_size: Self::default_page_size(),
        }
    }
}
