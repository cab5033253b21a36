//! Configuration
//!
//! Settings are read from the process environment (and an optional `.env`
//! file) once at startup, then handed to the storage and gateway
//! constructors. Nothing here is global.

use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::{GeminiConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

/// Environment variable holding the Gemini API credential
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the database connection string
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Optional model override
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
/// Optional API base URL override
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
/// Optional request timeout in seconds
pub const ENV_GEMINI_TIMEOUT_SECS: &str = "GEMINI_TIMEOUT_SECS";

/// Configuration error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required variable absent or blank
    #[error("{0} is not set")]
    Missing(&'static str),
    /// Variable present but unusable
    #[error("Invalid {var}: {reason}")]
    Invalid {
        var: &'static str,
        reason: String,
    },
}

/// Backing store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection string as supplied (`sqlite://path`, `sqlite:path` or a bare path)
    pub url: String,
}

impl DatabaseConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, ENV_DATABASE_URL)?;
        let config = Self { url };
        // Reject URLs we cannot map to a file before anything opens them
        config.path()?;
        Ok(config)
    }

    /// Resolve the SQLite file path behind the connection string
    pub fn path(&self) -> Result<PathBuf, ConfigError> {
        let raw = self.url.trim();
        let path = raw
            .strip_prefix("sqlite://")
            .or_else(|| raw.strip_prefix("sqlite:"))
            .unwrap_or(raw);

        if path.is_empty() {
            return Err(ConfigError::Invalid {
                var: ENV_DATABASE_URL,
                reason: "no database path given".to_string(),
            });
        }
        if let Some((scheme, _)) = path.split_once("://") {
            return Err(ConfigError::Invalid {
                var: ENV_DATABASE_URL,
                reason: format!("unsupported scheme '{}', expected sqlite", scheme),
            });
        }

        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let in_memory = path == ":memory:"
            || path.is_empty()
            || query.split('&').any(|param| param == "mode=memory");
        // Reader and writer connections would each get their own private database
        if in_memory {
            return Err(ConfigError::Invalid {
                var: ENV_DATABASE_URL,
                reason: "in-memory databases are not supported, give a file path".to_string(),
            });
        }

        // Remaining query parameters such as `?mode=rwc` are dropped
        Ok(PathBuf::from(path))
    }
}

impl GeminiConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, ENV_GEMINI_API_KEY)?;
        let model = optional(&lookup, ENV_GEMINI_MODEL)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = optional(&lookup, ENV_GEMINI_BASE_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        let timeout = match optional(&lookup, ENV_GEMINI_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| ConfigError::Invalid {
                    var: ENV_GEMINI_TIMEOUT_SECS,
                    reason: format!("'{}': {}", raw, e),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: ENV_GEMINI_TIMEOUT_SECS,
                        reason: "must be greater than 0".to_string(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout,
        })
    }
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Load everything the server needs from the process environment.
    ///
    /// Both the model credential and the database URL are required; a
    /// missing one is a startup failure.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            gemini: GeminiConfig::from_lookup(&lookup)?,
            database: DatabaseConfig::from_lookup(&lookup)?,
        })
    }
}

fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}
