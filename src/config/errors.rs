use thiserror::Error;

/// Errors raised while loading configuration
///
/// All of them abort start-up.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Setting '{setting}' has invalid value '{value}': {reason}")]
    InvalidValue {
        setting: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to load env file '{path}': {message}")]
    EnvFile { path: String, message: String },
}

impl ConfigError {
    pub fn invalid(setting: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            setting,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
