use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::Duration;
use thiserror::Error;

use crate::errors::InternalError;
use crate::types::internal::auth::Claims;
use crate::types::internal::models::{App, User};

/// Issues signed, bounded-lifetime tokens scoped to an application
///
/// Tokens are HS256-signed with the application's own secret; there is no
/// server-side session state.
#[derive(Debug, Default, Clone)]
pub struct TokenProvider;

impl TokenProvider {
    pub fn new() -> Self {
        Self
    }

    /// Issue a token for `user` scoped to `app`, valid for `ttl` from now
    ///
    /// # Returns
    /// * `Ok(String)` - The encoded token
    /// * `Err(InternalError::Crypto)` - Empty app secret, sub-second TTL, or signing failure
    pub fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, InternalError> {
        self.issue_at(user, app, ttl, Utc::now())
    }

    /// Issue a token as if it were `issued_at`
    pub fn issue_at(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, InternalError> {
        if app.secret.is_empty() {
            return Err(InternalError::crypto(
                "jwt_generation",
                format!("app {} has an empty signing secret", app.id),
            ));
        }
        if ttl < Duration::from_secs(1) {
            return Err(InternalError::crypto(
                "jwt_generation",
                format!("token ttl must be at least one second, got {:?}", ttl),
            ));
        }

        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| InternalError::crypto("jwt_generation", "token ttl out of range"))?;
        let iat = issued_at.timestamp();
        let exp = iat
            .checked_add(ttl_secs)
            .ok_or_else(|| InternalError::crypto("jwt_generation", "token ttl out of range"))?;

        let claims = Claims {
            uid: user.id,
            email: user.email.clone(),
            app_id: app.id,
            iat,
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(app.secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Verify a token's signature against `app` and its expiry against `now`
    pub fn verify_at(
        &self,
        token: &str,
        app: &App,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenVerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(app.secret.as_bytes()), &validation)
            .map_err(|e| TokenVerificationError::Invalid(e.to_string()))?
            .claims;

        if claims.app_id != app.id {
            return Err(TokenVerificationError::WrongApp {
                expected: app.id,
                found: claims.app_id,
            });
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenVerificationError::Expired { exp: claims.exp });
        }

        Ok(claims)
    }
}

/// Reasons a presented token is rejected
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenVerificationError {
    #[error("token expired at {exp}")]
    Expired { exp: i64 },

    #[error("token was issued for app {found}, expected {expected}")]
    WrongApp { expected: i32, found: i32 },

    #[error("invalid token: {0}")]
    Invalid(String),
}
