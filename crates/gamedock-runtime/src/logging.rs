//! # Logging Initialization
//!
//! Structured logging setup for the composing application. All core crates
//! emit `tracing` events; the host decides once, at startup, how they are
//! collected.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GAMEDOCK_LOG` | `info` | Log level filter directives |

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives, `EnvFilter` syntax.
    pub filter: String,
    /// Emit JSON-structured lines instead of human-readable ones.
    pub json: bool,
}

impl LoggingConfig {
    /// Read configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            filter: std::env::var("GAMEDOCK_LOG").unwrap_or_else(|_| "info".to_string()),
            json: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Logging initialization errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The filter string did not parse.
    #[error("invalid filter directive: {0}")]
    InvalidFilter(String),

    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// Call once from the composing application; library code never initializes
/// logging itself.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
