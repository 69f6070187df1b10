use thiserror::Error;

pub mod store;

pub use store::StoreError;

/// Internal error type for store and provider operations
///
/// Carries full diagnostic detail for the logs. Never exposed to callers:
/// the service wraps it in `AuthError::Internal` and the API layer replaces
/// it with a generic message.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: &'static str,
        message: String,
    },
}

impl InternalError {
    /// Create a crypto error with context
    pub fn crypto(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation,
            message: message.into(),
        }
    }
}
