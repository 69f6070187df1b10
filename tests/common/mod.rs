// Common test utilities for integration tests

use std::collections::HashMap;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use sso_backend::app_data::AppData;
use sso_backend::config::{EnvironmentProvider, Settings};
use sso_backend::providers::StaticHostResolver;
use sso_backend::stores::AppStore;
use sso_backend::types::internal::models::App;

pub const TEST_PASSWORD: &str = "correcthorsebatterystaple";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Fixed set of variables standing in for the process environment
pub struct MapEnvironment(HashMap<String, String>);

impl MapEnvironment {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl EnvironmentProvider for MapEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Settings with cheap Argon2 costs and a short request timeout
pub fn test_settings() -> Settings {
    Settings::from_env_provider(Arc::new(MapEnvironment::new(&[
        ("APP_ENV", "local"),
        ("ARGON2_MEMORY_KIB", "4096"),
        ("ARGON2_ITERATIONS", "1"),
        ("ARGON2_PARALLELISM", "1"),
        ("REQUEST_TIMEOUT", "5s"),
        ("TOKEN_TTL", "1h"),
    ])))
    .expect("valid test settings")
}

/// Production wiring over a fresh SQLite database, with DNS replaced by a static resolver
///
/// Returns (app_data, db, registered app)
pub async fn setup_app_data() -> (Arc<AppData>, DatabaseConnection, App) {
    let db = setup_test_db().await;
    let app = AppStore::new(db.clone())
        .create_app("integration-app", "integration-secret")
        .await
        .expect("Failed to create test app");

    let mut app_data = AppData::init(db.clone(), &test_settings()).expect("Failed to init AppData");
    app_data.host_resolver = Arc::new(StaticHostResolver::new(["example.com"]));

    (Arc::new(app_data), db, app)
}
