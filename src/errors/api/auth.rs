use crate::errors::auth::AuthError;
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Wire-level error responses for the authentication endpoints
#[derive(ApiResponse, Debug)]
pub enum AuthApiError {
    /// Request failed validation
    #[oai(status = 400)]
    InvalidRequest(Json<AuthErrorResponse>),

    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// User with this email not found
    #[oai(status = 404)]
    UserNotFound(Json<AuthErrorResponse>),

    /// Request was cancelled or ran past its deadline
    #[oai(status = 408)]
    RequestCancelled(Json<AuthErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    UserAlreadyExists(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthApiError {
    fn payload(code: &str, message: impl Into<String>, status_code: u16) -> Json<AuthErrorResponse> {
        Json(AuthErrorResponse {
            error: code.to_string(),
            message: message.into(),
            status_code,
        })
    }

    /// Convert an AuthError to its wire representation
    ///
    /// This is the explicit conversion point from service errors to API errors.
    /// The `error` field is the taxonomy code. Internal error details are logged
    /// but not exposed to clients.
    pub fn from_auth_error(err: AuthError) -> Self {
        let code = err.code();
        match &err {
            AuthError::InvalidRequest(reason) => {
                tracing::debug!("Invalid request: {}", reason);
                AuthApiError::InvalidRequest(Self::payload(code, reason.clone(), 400))
            }
            AuthError::InvalidCredentials => {
                tracing::debug!("Invalid credentials attempt");
                AuthApiError::InvalidCredentials(Self::payload(code, "invalid email or password", 401))
            }
            AuthError::UserAlreadyExists => {
                tracing::debug!("Duplicate registration attempt");
                AuthApiError::UserAlreadyExists(Self::payload(code, "user already exists", 409))
            }
            AuthError::UserNotFound => {
                tracing::debug!("User not found");
                AuthApiError::UserNotFound(Self::payload(code, "user not found", 404))
            }
            AuthError::Cancelled { operation, cause } => {
                tracing::warn!("{} interrupted: {}", operation, cause);
                AuthApiError::RequestCancelled(Self::payload(code, cause.to_string(), 408))
            }
            AuthError::Internal { operation, .. } => {
                tracing::error!("Internal error in {}: {}", operation, err);
                // Never carries internal detail
                AuthApiError::InternalError(Self::payload(code, "internal error", 500))
            }
        }
    }

    fn body(&self) -> &AuthErrorResponse {
        match self {
            AuthApiError::InvalidRequest(json)
            | AuthApiError::InvalidCredentials(json)
            | AuthApiError::UserNotFound(json)
            | AuthApiError::RequestCancelled(json)
            | AuthApiError::UserAlreadyExists(json)
            | AuthApiError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// Get the machine-readable error code
    pub fn error_code(&self) -> &str {
        &self.body().error
    }

    /// Get the HTTP status code carried by the error variant
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<AuthError> for AuthApiError {
    fn from(err: AuthError) -> Self {
        Self::from_auth_error(err)
    }
}

impl fmt::Display for AuthApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AuthApiError {}
