use actix_web::{http::header, web, FromRequest};
use error_stack::Report;
use futures::future::{ready, Ready};
use thiserror::Error;

use super::jwt::{Claims, InvalidToken};
use crate::error::{Error, ErrorKind};
use crate::types::UserId;
use crate::App;

/// Whoever sent the request.
#[derive(Debug)]
pub enum Actor {
    Anonymous,
    User(UserId),
}

impl Actor {
    pub fn require_user(self) -> Result<UserId, Error> {
        match self {
            Self::User(n) => Ok(n),
            Self::Anonymous => Err(ErrorKind::Unauthorized.into()),
        }
    }

    fn from_token(token: &str, app: &App) -> Result<Self, Error> {
        let claims = Claims::decode(token, &app.config.auth).map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            Error::from_report(ErrorKind::Unauthorized, Report::new(InvalidToken))
        })?;

        claims
            .user_id()
            .map(Self::User)
            .ok_or_else(|| ErrorKind::Unauthorized.into())
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Ok(Self::Anonymous));
        };

        let Some(app) = req.app_data::<web::Data<App>>() else {
            #[derive(Debug, Error)]
            #[error("The web app has no available configuration")]
            struct NoConfig;
            return ready(Err(Error::from_report(
                ErrorKind::Storage(NoConfig.to_string()),
                Report::new(NoConfig),
            )));
        };

        ready(Self::from_token(token.trim(), app))
    }
}
