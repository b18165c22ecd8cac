use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use super::{Error, ErrorExt, PoolConnection, Result, Transaction};
use crate::config;

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
    readonly: bool,
}

impl Pool {
    pub(crate) async fn new(
        global_cfg: &config::Database,
        pool_cfg: &config::DbPoolConfig,
    ) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(global_cfg.timeout_secs.get()))
            .max_connections(pool_cfg.pool_size.get());

        if let Some(min_idle) = pool_cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(pool_cfg.url.as_str()).change_context(Error::InvalidUrl)?;

        if global_cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Prefer);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
            readonly: pool_cfg.readonly,
        };

        if let Err(error) = pool.wait_until_healthy().await {
            tracing::warn!(%error, "database is unreachable, connections are retried on demand");
        }

        Ok(pool)
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[must_use]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub(crate) fn inner(&self) -> &sqlx::PgPool {
        &self.pool
    }

    /// Begins a transaction on the primary. Waits up to
    /// `db.timeout_secs` for a connection if none is idle.
    #[tracing::instrument(name = "db.transaction", skip(self))]
    pub async fn begin(&self) -> Result<Transaction<'static>> {
        if self.readonly {
            return Err(Report::new(Error::Readonly));
        }

        if let Some(inner) = self.pool.try_begin().await.into_db_error()? {
            return Ok(inner);
        }
        self.pool.begin().await.into_db_error()
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            return Ok(inner);
        }
        self.pool.acquire().await.into_db_error()
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        self.pool.acquire().await.into_db_error().map(|_| ())
    }
}

#[cfg(test)]
impl Pool {
    pub(crate) fn from_sqlx(pool: sqlx::PgPool) -> Self {
        Self {
            pool,
            readonly: false,
        }
    }
}
