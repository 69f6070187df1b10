use crate::errors::{AuthError, InternalError, Interruption, StoreError};
use sea_orm::DbErr;

#[test]
fn test_database_error_includes_operation() {
    let db_err = DbErr::RecordNotFound("test record".to_string());
    let error = StoreError::database("insert_user", db_err);

    let error_string = error.to_string();
    assert!(error_string.contains("insert_user"));
    assert!(error_string.contains("database error"));
}

#[test]
fn test_store_error_is_transparent_inside_internal_error() {
    let error: InternalError = StoreError::Unavailable("connection refused".to_string()).into();

    assert_eq!(error.to_string(), "store unavailable: connection refused");
}

#[test]
fn test_crypto_error_includes_operation() {
    let error = InternalError::crypto("argon2_hash", "invalid params");

    let error_string = error.to_string();
    assert!(error_string.contains("argon2_hash"));
    assert!(error_string.contains("invalid params"));
    assert!(error_string.contains("Crypto error"));
}

#[test]
fn test_auth_internal_error_wraps_operation_name() {
    let error = AuthError::internal("auth_service.register", StoreError::Unavailable("down".to_string()));

    let error_string = error.to_string();
    assert!(error_string.starts_with("auth_service.register"));
    assert!(error_string.contains("down"));
    assert_eq!(error.code(), "internal_error");
}

#[test]
fn test_cancelled_error_names_cause() {
    let cancelled = AuthError::Cancelled {
        operation: "auth_service.is_admin",
        cause: Interruption::Cancelled,
    };
    let expired = AuthError::Cancelled {
        operation: "auth_service.is_admin",
        cause: Interruption::DeadlineExceeded,
    };

    assert_eq!(cancelled.to_string(), "auth_service.is_admin: request cancelled");
    assert_eq!(expired.to_string(), "auth_service.is_admin: deadline exceeded");
}

#[test]
fn test_store_error_source_chain_is_preserved() {
    use std::error::Error;

    let error = AuthError::internal(
        "auth_service.login",
        StoreError::database("find_user_by_email", DbErr::Custom("boom".to_string())),
    );

    let source = error.source().map(|s| s.to_string()).unwrap_or_default();
    assert!(source.contains("find_user_by_email"));
}
