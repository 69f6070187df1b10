use std::fmt;

use thiserror::Error;

use crate::errors::InternalError;

/// Why an operation stopped before its collaborators answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The caller cancelled the request
    Cancelled,
    /// The request deadline passed
    DeadlineExceeded,
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interruption::Cancelled => f.write_str("request cancelled"),
            Interruption::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Caller-visible outcome of a failed authentication operation
///
/// The set is small and stable. `InvalidCredentials` deliberately covers both
/// unknown emails and wrong passwords.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request rejected by validation before any collaborator was called
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("{operation}: {cause}")]
    Cancelled {
        operation: &'static str,
        cause: Interruption,
    },

    /// Collaborator, storage or signing failure; detail is for logs only
    #[error("{operation}: {source}")]
    Internal {
        operation: &'static str,
        #[source]
        source: InternalError,
    },
}

impl AuthError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn internal(operation: &'static str, source: impl Into<InternalError>) -> Self {
        Self::Internal {
            operation,
            source: source.into(),
        }
    }

    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidRequest(_) => "invalid_request",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UserAlreadyExists => "user_already_exists",
            AuthError::UserNotFound => "user_not_found",
            AuthError::Cancelled { .. } => "request_cancelled",
            AuthError::Internal { .. } => "internal_error",
        }
    }
}
