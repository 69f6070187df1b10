use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::errors::{AuthError, StoreError};
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::{AppProvider, UserProvider, UserSaver};
use crate::types::internal::context::RequestContext;

/// Credential service: login, registration and admin queries
///
/// Stateless apart from its collaborators; shared across handlers via `Arc`.
/// Every collaborator call is bounded by the request context.
pub struct AuthService {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        crypto_provider: Arc<CryptoProvider>,
        token_provider: Arc<TokenProvider>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            crypto_provider,
            token_provider,
            token_ttl,
        }
    }

    /// Verify credentials and issue a token scoped to `app_id`
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    /// An unknown app is an internal failure: callers are registered apps.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<String, AuthError> {
        const OP: &str = "auth_service.login";

        async {
            tracing::info!(email, app_id, "attempting to login user");

            let user = match ctx.run(OP, self.user_provider.user(email)).await? {
                Ok(user) => user,
                Err(StoreError::UserNotFound(_)) => {
                    tracing::warn!(email, "user not found");
                    // Same Argon2 cost as a wrong password
                    ctx.run(OP, self.crypto_provider.verify_dummy(password))
                        .await?
                        .map_err(|e| {
                            tracing::error!("failed to run dummy verification: {}", e);
                            AuthError::internal(OP, e)
                        })?;
                    return Err(AuthError::InvalidCredentials);
                }
                Err(e) => {
                    tracing::error!("failed to get user: {}", e);
                    return Err(AuthError::internal(OP, e));
                }
            };

            let verified = ctx
                .run(OP, self.crypto_provider.verify_password(password, &user.password_hash))
                .await?
                .map_err(|e| {
                    tracing::error!("failed to verify password: {}", e);
                    AuthError::internal(OP, e)
                })?;

            if !verified {
                tracing::info!(user_id = user.id, "invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }

            let app = match ctx.run(OP, self.app_provider.app(app_id)).await? {
                Ok(app) => app,
                Err(e @ StoreError::AppNotFound(_)) => {
                    tracing::error!(app_id, "app doesn't exist");
                    return Err(AuthError::internal(OP, e));
                }
                Err(e) => {
                    tracing::error!("failed to get app: {}", e);
                    return Err(AuthError::internal(OP, e));
                }
            };

            let token = self
                .token_provider
                .issue(&user, &app, self.token_ttl)
                .map_err(|e| {
                    tracing::error!("failed to generate token: {}", e);
                    AuthError::internal(OP, e)
                })?;

            tracing::info!(user_id = user.id, app_id, "user logged in successfully");

            Ok(token)
        }
        .instrument(ctx.span(OP))
        .await
    }

    /// Hash the password and store a new user, returning the assigned id
    pub async fn register_new_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<i64, AuthError> {
        const OP: &str = "auth_service.register_new_user";

        async {
            tracing::info!(email, "registering user");

            let password_hash = ctx
                .run(OP, self.crypto_provider.hash_password(password))
                .await?
                .map_err(|e| {
                    tracing::error!("failed to generate password hash: {}", e);
                    AuthError::internal(OP, e)
                })?;

            let user_id = match ctx.run(OP, self.user_saver.save_user(email, &password_hash)).await? {
                Ok(id) => id,
                Err(StoreError::UserExists(_)) => {
                    tracing::warn!(email, "user already exists");
                    return Err(AuthError::UserAlreadyExists);
                }
                Err(e) => {
                    tracing::error!("failed to save user: {}", e);
                    return Err(AuthError::internal(OP, e));
                }
            };

            tracing::info!(user_id, "user registered");

            Ok(user_id)
        }
        .instrument(ctx.span(OP))
        .await
    }

    /// Report whether the user holds administrator privileges
    pub async fn is_admin(&self, ctx: &RequestContext, user_id: i64) -> Result<bool, AuthError> {
        const OP: &str = "auth_service.is_admin";

        async {
            tracing::info!(user_id, "checking if user is admin");

            let is_admin = match ctx.run(OP, self.user_provider.is_admin(user_id)).await? {
                Ok(is_admin) => is_admin,
                Err(StoreError::UserNotFound(_)) => {
                    tracing::warn!(user_id, "user not found");
                    return Err(AuthError::UserNotFound);
                }
                Err(e) => {
                    tracing::error!("failed to check admin flag: {}", e);
                    return Err(AuthError::internal(OP, e));
                }
            };

            tracing::info!(user_id, is_admin, "checked if user is admin");

            Ok(is_admin)
        }
        .instrument(ctx.span(OP))
        .await
    }
}
