use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::errors::InternalError;
use crate::providers::{CryptoProvider, DnsHostResolver, HostResolver, TokenProvider};
use crate::stores::{AppProvider, AppStore, UserProvider, UserSaver, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ user_saver / user_provider (Arc<UserStore>)
///   ├─ app_provider (Arc<AppStore>)
///   ├─ crypto_provider (Arc<CryptoProvider>)
///   ├─ token_provider (Arc<TokenProvider>)
///   └─ host_resolver (Arc<DnsHostResolver>)
///   ↓ wrapped in Arc<AppData>
///   └─ AuthCoordinator::new(app_data) → builds validator and service
/// ```
pub struct AppData {
    pub user_saver: Arc<dyn UserSaver>,
    pub user_provider: Arc<dyn UserProvider>,
    pub app_provider: Arc<dyn AppProvider>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub host_resolver: Arc<dyn HostResolver>,
    pub token_ttl: Duration,
    pub request_timeout: Duration,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError::Crypto` when the Argon2 settings are out of range
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let argon2 = settings.argon2();
        let crypto_provider = Arc::new(CryptoProvider::from_costs(
            argon2.memory_kib,
            argon2.iterations,
            argon2.parallelism,
            settings.password_pepper().map(str::to_string),
        )?);
        tracing::debug!("Crypto provider ready: {:?}", crypto_provider);

        let user_store = Arc::new(UserStore::new(db.clone()));
        let app_store = Arc::new(AppStore::new(db));

        tracing::info!("AppData initialization complete");

        Ok(Self {
            user_saver: user_store.clone(),
            user_provider: user_store,
            app_provider: app_store,
            crypto_provider,
            token_provider: Arc::new(TokenProvider::new()),
            host_resolver: Arc::new(DnsHostResolver),
            token_ttl: settings.token_ttl(),
            request_timeout: settings.request_timeout(),
        })
    }
}
