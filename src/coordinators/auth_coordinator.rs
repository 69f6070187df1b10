use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::AuthError;
use crate::providers::{EmailValidatorProvider, PasswordValidatorProvider};
use crate::services::{AuthService, RequestValidator};
use crate::types::internal::context::RequestContext;

/// Authentication coordinator
///
/// Runs the request validator and, only when it passes, the credential
/// service. Validation failures never reach a collaborator.
pub struct AuthCoordinator {
    validator: RequestValidator,
    auth_service: Arc<AuthService>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    ///
    /// Follows the AppData pattern: takes Arc<AppData> as single parameter,
    /// extracts collaborators from AppData, and creates providers internally.
    pub fn new(app_data: Arc<AppData>) -> Self {
        let validator = RequestValidator::new(
            EmailValidatorProvider::new(app_data.host_resolver.clone()),
            PasswordValidatorProvider::new(),
        );

        let auth_service = Arc::new(AuthService::new(
            app_data.user_saver.clone(),
            app_data.user_provider.clone(),
            app_data.app_provider.clone(),
            app_data.crypto_provider.clone(),
            app_data.token_provider.clone(),
            app_data.token_ttl,
        ));

        Self::from_parts(validator, auth_service)
    }

    pub fn from_parts(validator: RequestValidator, auth_service: Arc<AuthService>) -> Self {
        Self {
            validator,
            auth_service,
        }
    }

    /// Validate a login request, then verify credentials and issue a token
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<String, AuthError> {
        self.validator.validate_login(ctx, email, password, app_id).await?;
        self.auth_service.login(ctx, email, password, app_id).await
    }

    /// Validate a registration request, then store the new user
    pub async fn register(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<i64, AuthError> {
        self.validator.validate_register(ctx, email, password).await?;
        self.auth_service.register_new_user(ctx, email, password).await
    }

    /// Validate the user id, then query the admin flag
    pub async fn is_admin(&self, ctx: &RequestContext, user_id: i64) -> Result<bool, AuthError> {
        self.validator.validate_is_admin(user_id)?;
        self.auth_service.is_admin(ctx, user_id).await
    }
}
