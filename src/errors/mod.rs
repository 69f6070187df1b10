// Errors layer - Error type definitions
pub mod api;
pub mod auth;
pub mod internal;

// Re-exports for convenience
pub use api::AuthApiError;
pub use auth::{AuthError, Interruption};
pub use internal::{InternalError, StoreError};

#[cfg(test)]
mod internal_test;
