use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;
use std::time::Duration;

use crate::app_data::AppData;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthApiError;
use crate::types::dto::auth::{
    IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse,
};
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    coordinator: Arc<AuthCoordinator>,
    request_timeout: Duration,
}

impl AuthApi {
    /// Create AuthApi from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        let request_timeout = app_data.request_timeout;
        Self::with_coordinator(Arc::new(AuthCoordinator::new(app_data)), request_timeout)
    }

    pub fn with_coordinator(coordinator: Arc<AuthCoordinator>, request_timeout: Duration) -> Self {
        Self {
            coordinator,
            request_timeout,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with email and password to receive a token for an application
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthApiError> {
        let ctx = RequestContext::from_request(req, self.request_timeout);

        let token = self
            .coordinator
            .login(&ctx, &body.email, &body.password, body.app_id)
            .await?;

        Ok(Json(LoginResponse { token }))
    }

    /// Register a new user
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<Json<RegisterResponse>, AuthApiError> {
        let ctx = RequestContext::from_request(req, self.request_timeout);

        let user_id = self
            .coordinator
            .register(&ctx, &body.email, &body.password)
            .await?;

        Ok(Json(RegisterResponse { user_id }))
    }

    /// Check whether a user has administrator privileges
    #[oai(path = "/is-admin", method = "post", tag = "AuthTags::Authentication")]
    async fn is_admin(
        &self,
        req: &Request,
        body: Json<IsAdminRequest>,
    ) -> Result<Json<IsAdminResponse>, AuthApiError> {
        let ctx = RequestContext::from_request(req, self.request_timeout);

        let is_admin = self.coordinator.is_admin(&ctx, body.user_id).await?;

        Ok(Json(IsAdminResponse { is_admin }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{EmailValidatorProvider, PasswordValidatorProvider, StaticHostResolver};
    use crate::services::RequestValidator;
    use crate::stores::InMemoryStore;
    use crate::test::utils::{TEST_EMAIL, TEST_PASSWORD, create_test_auth_service, setup_test_store};

    async fn create_test_api() -> (AuthApi, Arc<InMemoryStore>, i32) {
        let (store, app) = setup_test_store().await;
        let validator = RequestValidator::new(
            EmailValidatorProvider::new(Arc::new(StaticHostResolver::new(["example.com"]))),
            PasswordValidatorProvider::new(),
        );
        let coordinator = Arc::new(AuthCoordinator::from_parts(
            validator,
            Arc::new(create_test_auth_service(&store)),
        ));
        (
            AuthApi::with_coordinator(coordinator, Duration::from_secs(5)),
            store,
            app.id,
        )
    }

    fn register_body(email: &str) -> Json<RegisterRequest> {
        Json(RegisterRequest {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        })
    }

    #[tokio::test]
    async fn test_register_then_login_returns_token() {
        let (api, _store, app_id) = create_test_api().await;
        let req = Request::builder().finish();

        let registered = api.register(&req, register_body(TEST_EMAIL)).await.unwrap();
        let login = api
            .login(
                &req,
                Json(LoginRequest {
                    email: TEST_EMAIL.to_string(),
                    password: TEST_PASSWORD.to_string(),
                    app_id,
                }),
            )
            .await
            .unwrap();

        assert!(registered.0.user_id > 0);
        assert!(!login.0.token.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_409() {
        let (api, _store, _) = create_test_api().await;
        let req = Request::builder().finish();
        api.register(&req, register_body(TEST_EMAIL)).await.unwrap();

        let result = api.register(&req, register_body(TEST_EMAIL)).await;

        match result {
            Err(err) => assert_eq!(err.status_code(), 409),
            Ok(_) => panic!("duplicate registration should fail"),
        }
    }

    #[tokio::test]
    async fn test_wrong_password_is_401() {
        let (api, _store, app_id) = create_test_api().await;
        let req = Request::builder().finish();
        api.register(&req, register_body(TEST_EMAIL)).await.unwrap();

        let result = api
            .login(
                &req,
                Json(LoginRequest {
                    email: TEST_EMAIL.to_string(),
                    password: "not-the-password-at-all".to_string(),
                    app_id,
                }),
            )
            .await;

        assert!(matches!(result, Err(AuthApiError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_is_400_with_reason() {
        let (api, store, app_id) = create_test_api().await;
        let req = Request::builder().finish();

        let result = api
            .login(
                &req,
                Json(LoginRequest {
                    email: String::new(),
                    password: "anypassword".to_string(),
                    app_id,
                }),
            )
            .await;

        match result {
            Err(err) => {
                assert_eq!(err.status_code(), 400);
                assert_eq!(err.message(), "email required");
            }
            Ok(_) => panic!("empty email should be rejected"),
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_is_admin_unknown_user_is_404() {
        let (api, _store, _) = create_test_api().await;
        let req = Request::builder().finish();

        let result = api.is_admin(&req, Json(IsAdminRequest { user_id: 99 })).await;

        assert!(matches!(result, Err(AuthApiError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_store_outage_is_500_without_detail() {
        let (api, store, _) = create_test_api().await;
        let req = Request::builder().finish();
        store.set_unavailable(true);

        let result = api.is_admin(&req, Json(IsAdminRequest { user_id: 1 })).await;

        match result {
            Err(err) => {
                assert_eq!(err.status_code(), 500);
                assert_eq!(err.message(), "internal error");
            }
            Ok(_) => panic!("outage should fail"),
        }
    }

    #[tokio::test]
    async fn test_request_past_deadline_is_408() {
        let store = Arc::new(InMemoryStore::new().with_latency(Duration::from_secs(30)));
        let validator = RequestValidator::new(
            EmailValidatorProvider::new(Arc::new(StaticHostResolver::new(["example.com"]))),
            PasswordValidatorProvider::new(),
        );
        let coordinator = Arc::new(AuthCoordinator::from_parts(
            validator,
            Arc::new(create_test_auth_service(&store)),
        ));
        let api = AuthApi::with_coordinator(coordinator, Duration::from_millis(20));
        let req = Request::builder().finish();

        let result = api.is_admin(&req, Json(IsAdminRequest { user_id: 1 })).await;

        assert!(matches!(result, Err(AuthApiError::RequestCancelled(_))));
    }
}
