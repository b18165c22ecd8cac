use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::types::UserId;

/// Claims of an access token issued by the hosted authentication
/// provider. Only the ones this server checks are listed.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    /// The user id.
    pub sub: String,
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug, Error)]
#[error("Invalid access token")]
pub struct InvalidToken;

const ALGORITHM: Algorithm = Algorithm::HS256;

impl Claims {
    #[must_use]
    pub fn new(user_id: &UserId, valid_for: chrono::Duration, auth: &config::Auth) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: (Utc::now() + valid_for).timestamp(),
            aud: auth.audience.clone(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub)
    }

    #[tracing::instrument(skip_all, name = "jwt.decode")]
    pub fn decode(token: &str, auth: &config::Auth) -> Result<Self, jsonwebtoken::errors::Error> {
        let key = DecodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
        let mut validation = Validation::new(ALGORITHM);
        if let Some(audience) = auth.audience.as_deref() {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        jsonwebtoken::decode::<Self>(token, &key, &validation).map(|data| data.claims)
    }

    #[tracing::instrument(skip_all, name = "jwt.encode")]
    pub fn encode(&self, auth: &config::Auth) -> Result<String, jsonwebtoken::errors::Error> {
        let key = EncodingKey::from_secret(auth.jwt_secret.as_str().as_bytes());
        jsonwebtoken::encode(&Header::new(ALGORITHM), self, &key)
    }
}
