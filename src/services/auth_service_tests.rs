use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::errors::{AuthError, InternalError, Interruption, StoreError};
use crate::providers::TokenProvider;
use crate::services::AuthService;
use crate::stores::{InMemoryStore, UserProvider};
use crate::test::utils::{
    TEST_APP_SECRET, TEST_EMAIL, TEST_PASSWORD, create_test_auth_service, setup_test_store,
    test_crypto_provider,
};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

fn decode_claims(token: &str) -> Claims {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    decode::<Claims>(token, &DecodingKey::from_secret(TEST_APP_SECRET.as_bytes()), &validation)
        .unwrap()
        .claims
}

#[tokio::test]
async fn test_login_issues_token_for_registered_user() {
    let (store, app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();

    let user_id = service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    let token = service.login(&ctx, TEST_EMAIL, TEST_PASSWORD, app.id).await.unwrap();

    let claims = decode_claims(&token);
    assert_eq!(claims.uid, user_id);
    assert_eq!(claims.email, TEST_EMAIL);
    assert_eq!(claims.app_id, app.id);
    assert_eq!(claims.exp - claims.iat, 300);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_invalid_credentials() {
    let (store, app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();
    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    let result = service.login(&ctx, TEST_EMAIL, "the-wrong-password-entirely", app.id).await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_with_unknown_email_is_invalid_credentials() {
    let (store, app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();

    let result = service.login(&ctx, "ghost@example.com", TEST_PASSWORD, app.id).await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_both_run_argon2() {
    let (store, app) = setup_test_store().await;
    let crypto = test_crypto_provider();
    let service = AuthService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        crypto.clone(),
        Arc::new(TokenProvider::new()),
        Duration::from_secs(300),
    );
    let ctx = RequestContext::new();
    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    assert_eq!(crypto.verifications(), 0);

    let unknown = service.login(&ctx, "ghost@example.com", TEST_PASSWORD, app.id).await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    assert_eq!(crypto.verifications(), 1);

    let wrong = service.login(&ctx, TEST_EMAIL, "the-wrong-password-entirely", app.id).await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    assert_eq!(crypto.verifications(), 2);
}

#[tokio::test]
async fn test_login_for_unknown_app_is_internal() {
    let (store, app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();
    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    let result = service.login(&ctx, TEST_EMAIL, TEST_PASSWORD, app.id + 100).await;

    assert!(matches!(
        result,
        Err(AuthError::Internal {
            operation: "auth_service.login",
            source: InternalError::Store(StoreError::AppNotFound(_)),
        })
    ));
}

#[tokio::test]
async fn test_login_with_empty_app_secret_is_internal() {
    let (store, _app) = setup_test_store().await;
    let keyless = store.add_app("keyless", "").await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();
    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    let result = service.login(&ctx, TEST_EMAIL, TEST_PASSWORD, keyless.id).await;

    assert!(matches!(
        result,
        Err(AuthError::Internal { source: InternalError::Crypto { .. }, .. })
    ));
}

#[tokio::test]
async fn test_second_registration_is_user_already_exists() {
    let (store, _app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();

    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    let result = service.register_new_user(&ctx, TEST_EMAIL, "another-strong-passphrase").await;

    assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn test_registration_stores_hash_not_plaintext() {
    let (store, _app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();

    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    let user = store.user(TEST_EMAIL).await.unwrap();
    assert_ne!(user.password_hash, TEST_PASSWORD);
    assert!(!user.password_hash.contains(TEST_PASSWORD));
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_is_admin_reflects_flag() {
    let (store, _app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();
    let user_id = service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    assert!(!service.is_admin(&ctx, user_id).await.unwrap());

    store.set_admin(user_id, true).await.unwrap();
    assert!(service.is_admin(&ctx, user_id).await.unwrap());
}

#[tokio::test]
async fn test_is_admin_for_unknown_user_is_user_not_found() {
    let (store, _app) = setup_test_store().await;
    let service = create_test_auth_service(&store);

    let result = service.is_admin(&RequestContext::new(), 404).await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
}

#[tokio::test]
async fn test_store_outage_is_internal() {
    let (store, app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new();
    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    store.set_unavailable(true);

    let login = service.login(&ctx, TEST_EMAIL, TEST_PASSWORD, app.id).await;
    let register = service.register_new_user(&ctx, "new@example.com", TEST_PASSWORD).await;
    let is_admin = service.is_admin(&ctx, 1).await;

    for result in [login.map(|_| ()), register.map(|_| ()), is_admin.map(|_| ())] {
        assert!(matches!(
            result,
            Err(AuthError::Internal { source: InternalError::Store(StoreError::Unavailable(_)), .. })
        ));
    }
}

#[tokio::test]
async fn test_cancelled_context_fails_without_touching_store() {
    let (store, app) = setup_test_store().await;
    let service = create_test_auth_service(&store);
    let (ctx, handle) = RequestContext::new().cancellable();
    handle.cancel();

    let result = service.login(&ctx, TEST_EMAIL, TEST_PASSWORD, app.id).await;

    assert!(matches!(
        result,
        Err(AuthError::Cancelled { operation: "auth_service.login", cause: Interruption::Cancelled })
    ));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_cancellation_mid_call_aborts_operation() {
    let store = Arc::new(InMemoryStore::new().with_latency(Duration::from_secs(30)));
    let service = create_test_auth_service(&store);
    let (ctx, handle) = RequestContext::new().cancellable();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });
    let result = tokio::time::timeout(Duration::from_secs(5), service.is_admin(&ctx, 1))
        .await
        .expect("cancellation should stop the operation promptly");
    canceller.await.unwrap();

    assert!(matches!(
        result,
        Err(AuthError::Cancelled { cause: Interruption::Cancelled, .. })
    ));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_deadline_exceeded_during_store_call() {
    let store = Arc::new(InMemoryStore::new().with_latency(Duration::from_secs(30)));
    let service = create_test_auth_service(&store);
    let ctx = RequestContext::new().with_timeout(Duration::from_millis(20));

    let result = service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await;

    assert!(matches!(
        result,
        Err(AuthError::Cancelled {
            operation: "auth_service.register_new_user",
            cause: Interruption::DeadlineExceeded,
        })
    ));
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn test_sub_second_ttl_fails_login_as_internal() {
    let (store, app) = setup_test_store().await;
    let service = AuthService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        test_crypto_provider(),
        Arc::new(TokenProvider::new()),
        Duration::from_millis(100),
    );
    let ctx = RequestContext::new();
    service.register_new_user(&ctx, TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    let result = service.login(&ctx, TEST_EMAIL, TEST_PASSWORD, app.id).await;

    assert!(matches!(result, Err(AuthError::Internal { .. })));
}
