use error_stack::{Context, Report};
use serde::ser::SerializeStruct;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::database;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong, as reported to clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("You already liked this post")]
    AlreadyLiked,
    #[error("You have not liked this post")]
    LikeNotFound,
    #[error("You have no likes left to give")]
    LikeBudgetExhausted,
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Authentication is required")]
    Unauthorized,
    #[error("This server is currently in read-only mode. Please try again later.")]
    ReadonlyMode,
    /// The storage backend failed. The message is passed through as is.
    #[error("{0}")]
    Storage(String),
}

impl ErrorKind {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyLiked => "already_liked",
            Self::LikeNotFound => "like_not_found",
            Self::LikeBudgetExhausted => "like_budget_exhausted",
            Self::ProfileNotFound => "profile_not_found",
            Self::NotFound => "not_found",
            Self::InvalidRequest(..) => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::ReadonlyMode => "readonly_mode",
            Self::Storage(..) => "storage",
        }
    }
}

impl serde::Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("Error", 2)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

/// Error returned by every service, carrying the report of what
/// caused it and the span trace where it was created.
pub struct Error {
    report: Report<ErrorKind>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            report: Report::new(kind),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_report(kind: ErrorKind, report: Report<impl Context>) -> Self {
        Self {
            report: report.change_context(kind),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest(message.into()))
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        self.report.current_context()
    }

    #[must_use]
    pub fn report(&self) -> &Report<ErrorKind> {
        &self.report
    }

    #[must_use]
    pub fn trace(&self) -> &SpanTrace {
        &self.trace
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self.report)?;
        std::fmt::Display::fmt(&self.trace, f)
    }
}

impl From<ErrorKind> for Error {
    fn from(value: ErrorKind) -> Self {
        Self::new(value)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        let kind = match value.current_context() {
            database::Error::Readonly => ErrorKind::ReadonlyMode,
            other => ErrorKind::Storage(other.to_string()),
        };
        Self::from_report(kind, value)
    }
}
