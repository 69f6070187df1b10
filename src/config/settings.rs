use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, EnvironmentProvider, LoggingConfig};

const DEFAULT_DATABASE_URL: &str = "sqlite://sso.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(5 * 60);
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const MAX_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19456;
const DEFAULT_ARGON2_ITERATIONS: u32 = 2;
const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

/// Deployment environment, selects logging defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Dev,
    Prod,
}

impl AppEnv {
    pub fn default_log_level(&self) -> &'static str {
        match self {
            AppEnv::Local | AppEnv::Dev => "debug",
            AppEnv::Prod => "info",
        }
    }
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(AppEnv::Local),
            "dev" => Ok(AppEnv::Dev),
            "prod" => Ok(AppEnv::Prod),
            _ => Err("expected one of: local, dev, prod".to_string()),
        }
    }
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Application settings loaded once at start-up
#[derive(Clone)]
pub struct Settings {
    env: AppEnv,
    database_url: String,
    server_host: String,
    server_port: u16,
    request_timeout: Duration,
    token_ttl: Duration,
    password_pepper: Option<String>,
    argon2: Argon2Settings,
    logging: LoggingConfig,
}

impl Settings {
    /// Load settings from the given environment provider
    ///
    /// Unset or blank variables fall back to their defaults; set but
    /// malformed values are errors.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        let env = parse_or("APP_ENV", env_provider.as_ref(), AppEnv::Prod, |v| v.parse())?;

        let database_url = env_provider
            .get_non_empty("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let server_host = env_provider
            .get_non_empty("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let server_port = parse_or("PORT", env_provider.as_ref(), DEFAULT_PORT, |v| {
            match v.parse::<u16>() {
                Ok(0) => Err("port must be between 1 and 65535".to_string()),
                Ok(port) => Ok(port),
                Err(e) => Err(e.to_string()),
            }
        })?;

        let request_timeout = parse_or(
            "REQUEST_TIMEOUT",
            env_provider.as_ref(),
            DEFAULT_REQUEST_TIMEOUT,
            parse_duration,
        )?;
        if request_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "REQUEST_TIMEOUT",
                format!("{:?}", request_timeout),
                "must be greater than zero",
            ));
        }
        if request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(ConfigError::invalid(
                "REQUEST_TIMEOUT",
                format!("{:?}", request_timeout),
                format!("must be at most {:?}", MAX_REQUEST_TIMEOUT),
            ));
        }

        let token_ttl = parse_or("TOKEN_TTL", env_provider.as_ref(), DEFAULT_TOKEN_TTL, parse_duration)?;
        // Claims are second-granular
        if token_ttl < Duration::from_secs(1) {
            return Err(ConfigError::invalid(
                "TOKEN_TTL",
                format!("{:?}", token_ttl),
                "must be at least one second",
            ));
        }
        if token_ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::invalid(
                "TOKEN_TTL",
                format!("{:?}", token_ttl),
                format!("must be at most {:?}", MAX_TOKEN_TTL),
            ));
        }

        let argon2 = Argon2Settings {
            memory_kib: parse_or("ARGON2_MEMORY_KIB", env_provider.as_ref(), DEFAULT_ARGON2_MEMORY_KIB, parse_u32)?,
            iterations: parse_or("ARGON2_ITERATIONS", env_provider.as_ref(), DEFAULT_ARGON2_ITERATIONS, parse_u32)?,
            parallelism: parse_or("ARGON2_PARALLELISM", env_provider.as_ref(), DEFAULT_ARGON2_PARALLELISM, parse_u32)?,
        };

        let logging = LoggingConfig {
            log_level: env_provider
                .get_non_empty("LOG_LEVEL")
                .unwrap_or_else(|| env.default_log_level().to_string()),
            app_log_file: env_provider.get_non_empty("APP_LOG_FILE").map(PathBuf::from),
            json: env != AppEnv::Local,
        };

        Ok(Self {
            env,
            database_url,
            server_host,
            server_port,
            request_timeout,
            token_ttl,
            password_pepper: env_provider.get_non_empty("PASSWORD_PEPPER"),
            argon2,
            logging,
        })
    }

    pub fn env(&self) -> AppEnv {
        self.env
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn password_pepper(&self) -> Option<&str> {
        self.password_pepper.as_deref()
    }

    pub fn argon2(&self) -> Argon2Settings {
        self.argon2
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("env", &self.env)
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("request_timeout", &self.request_timeout)
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "<redacted>"))
            .field("argon2", &self.argon2)
            .field("logging", &self.logging)
            .finish()
    }
}

fn parse_or<T>(
    setting: &'static str,
    env_provider: &(dyn EnvironmentProvider + Send + Sync),
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    match env_provider.get_non_empty(setting) {
        Some(value) => parse(&value).map_err(|reason| ConfigError::invalid(setting, value, reason)),
        None => Ok(default),
    }
}

fn parse_u32(value: &str) -> Result<u32, String> {
    value.parse::<u32>().map_err(|e| e.to_string())
}

/// Parse a duration such as `500ms`, `3s`, `5m`, `1h` or bare seconds (`30`)
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => value.split_at(index),
        None => (value, "s"),
    };

    if number.is_empty() {
        return Err("expected a number followed by ms, s, m or h".to_string());
    }
    let amount: u64 = number.parse().map_err(|e| format!("invalid number: {}", e))?;

    let seconds = |multiplier: u64| {
        amount
            .checked_mul(multiplier)
            .map(Duration::from_secs)
            .ok_or_else(|| "duration out of range".to_string())
    };

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(amount)),
        "s" => seconds(1),
        "m" => seconds(60),
        "h" => seconds(3600),
        other => Err(format!("unknown unit '{}', expected ms, s, m or h", other)),
    }
}
