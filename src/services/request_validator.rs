use crate::errors::AuthError;
use crate::providers::{EmailValidatorProvider, PasswordValidatorProvider};
use crate::types::internal::context::RequestContext;

const EMAIL_REQUIRED: &str = "email required";
const WEAK_PASSWORD: &str = "weak password";
const APP_ID_REQUIRED: &str = "app_id required";
const USER_ID_REQUIRED: &str = "user id required";

/// Structural and semantic checks run before any collaborator is touched
///
/// Checks run in a fixed order and the first failure wins:
/// email presence, email format, email host, password entropy, then ids.
#[derive(Clone)]
pub struct RequestValidator {
    email_validator: EmailValidatorProvider,
    password_validator: PasswordValidatorProvider,
}

impl RequestValidator {
    pub fn new(
        email_validator: EmailValidatorProvider,
        password_validator: PasswordValidatorProvider,
    ) -> Self {
        Self {
            email_validator,
            password_validator,
        }
    }

    pub async fn validate_login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<(), AuthError> {
        self.validate_credentials(ctx, email, password).await?;

        if app_id == 0 {
            return Err(Self::reject(APP_ID_REQUIRED));
        }

        Ok(())
    }

    pub async fn validate_register(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.validate_credentials(ctx, email, password).await
    }

    pub fn validate_is_admin(&self, user_id: i64) -> Result<(), AuthError> {
        if user_id == 0 {
            return Err(Self::reject(USER_ID_REQUIRED));
        }

        Ok(())
    }

    async fn validate_credentials(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if email.is_empty() {
            return Err(Self::reject(EMAIL_REQUIRED));
        }

        self.email_validator
            .validate_format(email)
            .map_err(|e| Self::reject(e.to_string()))?;

        ctx.run(
            "request_validator.resolve_host",
            self.email_validator.validate_host(email),
        )
        .await?
        .map_err(|e| Self::reject(e.to_string()))?;

        self.password_validator.validate(password).map_err(|e| {
            tracing::debug!("password rejected: {}", e);
            Self::reject(WEAK_PASSWORD)
        })?;

        Ok(())
    }

    fn reject(reason: impl Into<String>) -> AuthError {
        let reason = reason.into();
        tracing::debug!("request rejected: {}", reason);
        AuthError::InvalidRequest(reason)
    }
}
