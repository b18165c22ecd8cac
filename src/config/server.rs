use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::Validate;

use super::{Auth, Database, Likes, Logging, Notifications, ParseError};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport, Sensitive};

#[derive(Debug, Deserialize, Validate)]
pub struct Server {
    /// **Environment variable**: `SKETCHBOOK_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variable**: `SKETCHBOOK_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// **Environment variable**: `SKETCHBOOK_WORKERS`
    ///
    /// Defaults to the amount of available cores, up to 4.
    #[serde(default = "Server::default_workers")]
    pub workers: NonZeroUsize,
    #[validate(nested)]
    pub auth: Auth,
    #[validate(nested)]
    pub db: Database,
    #[serde(default)]
    #[validate(nested)]
    pub likes: Likes,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default)]
    pub logging: Logging,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }

    /// Loads the server test configuration. Every store operation
    /// is done in memory.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            ip: Self::default_ip(),
            port: Self::default_port(),
            workers: NonZeroUsize::MIN,
            auth: Auth {
                jwt_secret: Sensitive::new(String::from("sketchbook-test-secret")),
                audience: None,
            },
            db: Database::in_memory(),
            likes: Likes::default(),
            notifications: Notifications::default(),
            logging: Logging::default(),
        }
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "sketchbook.toml";
    const DEFAULT_PORT: u16 = 8080;
    const MAX_DEFAULT_WORKERS: usize = 4;

    fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_workers() -> NonZeroUsize {
        let cores = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        NonZeroUsize::new(cores.min(Self::MAX_DEFAULT_WORKERS)).unwrap_or(NonZeroUsize::MIN)
    }

    /// Creates a default [`Figment`] object to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // One big con about figment (env provider to be specific) especially
            // these fields with underscore in it.
            .merge(Env::prefixed("SKETCHBOOK_").map(|v| match v.as_str() {
                "AUTH_JWT_SECRET" => "auth.jwt_secret".into(),

                "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
                "DB_RUN_MIGRATIONS" => "db.run_migrations".into(),
                "DB_IN_MEMORY" => "db.in_memory".into(),

                "LIKES_DEFAULT_AVAILABLE" => "likes.default_available".into(),
                "LIKES_RESTORE_BUDGET_ON_UNLIKE" => "likes.restore_budget_on_unlike".into(),

                "NOTIFICATIONS_POLL_INTERVAL_SECS" => "notifications.poll_interval_secs".into(),
                "NOTIFICATIONS_PAGE_SIZE" => "notifications.page_size".into(),

                _ => v.as_str().to_lowercase().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "JWT_SECRET"])
                    .map(|v| match v.as_str() {
                        "DATABASE_URL" => "db.primary.url".into(),
                        _ => "auth.jwt_secret".into(),
                    }),
            )
    }
}
