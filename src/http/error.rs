use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};

use crate::error::{Error, ErrorKind};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::AlreadyLiked | ErrorKind::LikeBudgetExhausted => StatusCode::CONFLICT,
            ErrorKind::LikeNotFound | ErrorKind::ProfileNotFound | ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorKind::InvalidRequest(..) => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Storage(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self.report(), "request failed");
        }
        HttpResponse::build(status).json(self.kind())
    }
}

/// Turns extractor errors (malformed paths, queries and bodies) into
/// [`ErrorKind::InvalidRequest`] responses.
pub fn invalid_request<E: std::fmt::Display>(
    error: E,
    _: &actix_web::HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(error.to_string()).into()
}
