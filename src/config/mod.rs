mod database;
mod env_provider;
mod errors;
mod logging;
mod settings;

pub use database::{connect_database, migrate_database};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use settings::{AppEnv, Argon2Settings, Settings, parse_duration};
