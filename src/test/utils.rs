// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::providers::{CryptoProvider, TokenProvider};
use crate::services::AuthService;
use crate::stores::InMemoryStore;
use crate::types::internal::models::App;

pub const TEST_EMAIL: &str = "user@example.com";
pub const TEST_PASSWORD: &str = "correcthorsebatterystaple";
pub const TEST_APP_SECRET: &str = "test-app-signing-secret";
pub const TEST_TOKEN_TTL: Duration = Duration::from_secs(300);

/// Creates an in-memory SQLite database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Crypto provider with cheap Argon2 costs
pub fn test_crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(CryptoProvider::from_costs(4096, 1, 1, None).expect("valid test argon2 params"))
}

/// Creates an AuthService backed entirely by `store`
pub fn create_test_auth_service(store: &Arc<InMemoryStore>) -> AuthService {
    AuthService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        test_crypto_provider(),
        Arc::new(TokenProvider::new()),
        TEST_TOKEN_TTL,
    )
}

/// Creates an in-memory store holding one registered app
///
/// Returns (store, app)
pub async fn setup_test_store() -> (Arc<InMemoryStore>, App) {
    let store = Arc::new(InMemoryStore::new());
    let app = store.add_app("test-app", TEST_APP_SECRET).await;
    (store, app)
}
