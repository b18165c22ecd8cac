use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
    /// An error caused by an invalid Postgres connection
    /// url for either the primary or the replica pool.
    #[error("invalid connection url")]
    InvalidUrl,
    /// An error caused by an [`sqlx`] error.
    #[error("{0}")]
    Internal(sqlx::Error),
    /// The database pool (primary) is currently in read mode
    /// (most likely due to maintenance) and should not perform
    /// any writes.
    #[error("database is currently in read mode")]
    Readonly,
    /// Either the primary or replica database pools do not
    /// have reliable connection to transact to the database.
    #[error("unhealthy database pool")]
    UnhealthyPool,
    /// Pending migrations could not be applied on startup.
    #[error("failed to run database migrations")]
    Migration,
    /// The store refused the operation with a message of its own.
    #[error("{0}")]
    Rejected(String),
}

/// SQLSTATE `read_only_sql_transaction`
const READ_ONLY_SQL_TRANSACTION: &str = "25006";

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|e| match &e {
            sqlx::Error::Database(err)
                if err.code().as_deref() == Some(READ_ONLY_SQL_TRANSACTION)
                    || err.message().ends_with("read-only transaction") =>
            {
                Report::new(e).change_context(Error::Readonly)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(..) => {
                Report::new(e).change_context(Error::UnhealthyPool)
            }
            _ => Report::new(Error::Internal(e)),
        })
    }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Checks against the current context of `Report<Error>` without
/// matching on it every time.
pub trait ErrorExt2 {
    fn is_unhealthy(&self) -> bool;
    fn is_readonly(&self) -> bool;
}

impl ErrorExt2 for Report<Error> {
    fn is_unhealthy(&self) -> bool {
        matches!(self.current_context(), Error::UnhealthyPool)
    }

    fn is_readonly(&self) -> bool {
        matches!(self.current_context(), Error::Readonly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_helpers() {
        assert!(Report::new(Error::UnhealthyPool).is_unhealthy());
        assert!(!Report::new(Error::UnhealthyPool).is_readonly());
        assert!(Report::new(Error::Readonly).is_readonly());
    }

    #[test]
    fn rejected_message_is_kept() {
        let error = Error::Rejected(String::from("connection reset"));
        assert_eq!(error.to_string(), "connection reset");
    }

    #[test]
    fn connection_failures_are_unhealthy() {
        let result: std::result::Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        assert!(result.into_db_error().unwrap_err().is_unhealthy());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let result: std::result::Result<(), sqlx::Error> = Err(sqlx::Error::Io(io));
        assert!(result.into_db_error().unwrap_err().is_unhealthy());
    }

    #[test]
    fn non_database_errors_are_internal() {
        let result: std::result::Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let report = result.into_db_error().unwrap_err();
        assert!(matches!(report.current_context(), Error::Internal(..)));
    }
}
