//! Configuration loading and constants.
//!
//! Configuration comes from the process environment. Every variable is optional
//! and falls back to a literal default. `AppConfig` is built once at startup and
//! is immutable afterwards.

use std::fmt;

use const_format::formatcp;

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_APP_MESSAGE: &str = "APP_MESSAGE";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_DB_HOST: &str = "postgres";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "appdb";
pub const DEFAULT_DB_USER: &str = "appuser";
pub const DEFAULT_DB_PASSWORD: &str = "";
pub const DEFAULT_APP_MESSAGE: &str = "Hello from backend (default)!";

/// Default HTTP listen host
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP listen port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!(
    "{}=info,tower_http=info,sqlx=warn",
    env!("CARGO_CRATE_NAME")
);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Text;

// =============================================================================
// Database Pool
// =============================================================================

/// Seconds a statement waits for a pooled connection before failing. Bounds how
/// long `/api/health` takes to report an unreachable database, since the pool
/// keeps retrying refused connections until this runs out.
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 3;

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Counter responses change on every call and must never be cached
pub const CACHE_CONTROL_API: &str = "no-store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Database connection settings
    pub db: DbConfig,
    /// Display string returned by the message endpoint
    pub message: String,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// PostgreSQL connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    /// May be empty
    pub password: String,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            name: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable
    Text,
    /// Structured, one JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// A variable that is present but empty counts as set. `DB_PORT` must parse
    /// as a `u16`; anything else is rejected rather than passed through.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup(ENV_DB_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_DB_PORT,
        };

        let format = match lookup(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse()?,
            None => DEFAULT_LOG_FORMAT,
        };

        Ok(Self {
            db: DbConfig {
                host: or_default(ENV_DB_HOST, DEFAULT_DB_HOST),
                port,
                name: or_default(ENV_DB_NAME, DEFAULT_DB_NAME),
                user: or_default(ENV_DB_USER, DEFAULT_DB_USER),
                password: or_default(ENV_DB_PASSWORD, DEFAULT_DB_PASSWORD),
            },
            message: or_default(ENV_APP_MESSAGE, DEFAULT_APP_MESSAGE),
            logging: LoggingConfig { format },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DB_PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
    #[error("LOG_FORMAT must be \"text\" or \"json\", got {0:?}")]
    InvalidLogFormat(String),
}
