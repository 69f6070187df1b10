// Stores layer - Data access behind narrow collaborator contracts
use async_trait::async_trait;

use crate::errors::StoreError;
use crate::types::internal::models::{App, User};

pub mod app_store;
pub mod memory_store;
pub mod user_store;

pub use app_store::AppStore;
pub use memory_store::InMemoryStore;
pub use user_store::UserStore;

/// Persists newly registered users
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Store a user and return the id assigned by storage
    ///
    /// Fails with `StoreError::UserExists` when the email is taken.
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<i64, StoreError>;
}

/// Looks up registered users
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Fails with `StoreError::UserNotFound` when no user has this email
    async fn user(&self, email: &str) -> Result<User, StoreError>;

    /// Fails with `StoreError::UserNotFound` when no user has this id
    async fn is_admin(&self, user_id: i64) -> Result<bool, StoreError>;
}

/// Looks up registered applications
#[async_trait]
pub trait AppProvider: Send + Sync {
    /// Fails with `StoreError::AppNotFound` when no app has this id
    async fn app(&self, app_id: i32) -> Result<App, StoreError>;
}
