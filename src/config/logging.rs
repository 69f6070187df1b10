use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for application logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `sso_backend=debug,sea_orm=warn`
    pub log_level: String,
    /// Daily-rotated log file, in addition to the console
    pub app_log_file: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the tracing subscriber with console and optional file output
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let mut layers: Vec<BoxedLayer> = vec![console_layer(config)?];

    if let Some(log_file_path) = &config.app_log_file {
        layers.push(file_layer(config, log_file_path)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationError(e.to_string()))?;

    Ok(())
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", config.log_level, e)))
}

fn console_layer(config: &LoggingConfig) -> Result<BoxedLayer, LoggingError> {
    let filter = env_filter(config)?;

    let layer: BoxedLayer = if config.json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed()
    };

    Ok(layer)
}

fn file_layer(config: &LoggingConfig, log_file_path: &Path) -> Result<BoxedLayer, LoggingError> {
    let directory = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file_path
        .file_name()
        .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;

    std::fs::create_dir_all(directory)?;

    // Create file appender with daily rotation
    let file_appender = tracing_appender::rolling::daily(directory, file_name);

    Ok(fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter(config)?)
        .boxed())
}
