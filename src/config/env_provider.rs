#[cfg(test)]
use std::collections::HashMap;

use crate::config::ConfigError;

/// Trait for providing environment variable access
///
/// This abstraction allows for dependency injection of environment variable
/// sources, enabling clean testing without race conditions from parallel
/// test execution modifying shared global environment state.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;

    /// Value of `key`, treating blank values as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl SystemEnvironment {
    /// Load a dotenv file into the process environment, then read from it
    ///
    /// With no explicit path a missing `.env` is not an error.
    pub fn load(env_file: Option<&str>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
                    path: path.to_string(),
                    message: e.to_string(),
                })?;
            }
            None => {
                dotenv::dotenv().ok();
            }
        }
        Ok(Self)
    }
}

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test environment provider with configurable variables
///
/// Allows tests to provide specific environment variable values
/// without modifying the global environment state.
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
