use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::util::Sensitive;

/// Verification settings for tokens issued by the hosted
/// authentication provider.
#[derive(Debug, Deserialize, Validate)]
pub struct Auth {
    /// Shared HMAC secret used to sign the provider's access tokens.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_AUTH_JWT_SECRET` or `JWT_SECRET`
    #[validate(custom(function = "validate_jwt_secret"))]
    pub jwt_secret: Sensitive<String>,
    /// Expected `aud` claim. Audience is not checked if it is not set.
    ///
    /// **Environment variables**:
    /// - `SKETCHBOOK_AUTH_AUDIENCE`
    #[serde(default)]
    pub audience: Option<String>,
}

impl Auth {
    const MIN_SECRET_LEN: usize = 12;
    const MAX_SECRET_LEN: usize = 1024;
}

fn validate_jwt_secret(value: &Sensitive<String>) -> Result<(), ValidationError> {
    let len = value.as_str().len();
    if (Auth::MIN_SECRET_LEN..=Auth::MAX_SECRET_LEN).contains(&len) {
        Ok(())
    } else {
        let mut error = ValidationError::new("length");
        error.message = Some("Invalid JWT secret key".into());
        Err(error)
    }
}
