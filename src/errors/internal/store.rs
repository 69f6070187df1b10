use thiserror::Error;

/// Failures reported by the storage collaborators
///
/// The not-found and duplicate variants are part of the collaborator
/// contracts; the service turns them into caller-visible outcomes.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("app already exists: {0}")]
    AppExists(String),

    #[error("app not found: {0}")]
    AppNotFound(i32),

    #[error("database error: {operation} failed: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Store could not be reached (used by the in-memory store to simulate outages)
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn database(operation: &'static str, source: sea_orm::DbErr) -> Self {
        Self::Database { operation, source }
    }
}
