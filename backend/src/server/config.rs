//! Environment-driven application configuration.
//!
//! Every external dependency the gateway talks to is configured through
//! environment variables so deployments never patch code to repoint an
//! endpoint.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;

/// Configuration errors raised during startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable {name}")]
    Missing {
        /// Variable name.
        name: &'static str,
    },
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        message: String,
    },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::Missing { name }
    }

    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            message: message.into(),
        }
    }
}

/// Storage backend selection for result artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3-compatible object storage, credentials from the environment.
    S3 {
        /// Bucket name.
        bucket: String,
    },
    /// Local filesystem directory.
    Local {
        /// Root directory for stored artifacts.
        root: String,
    },
    /// Process-local in-memory store, for development only.
    Memory,
}

/// Full application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Auth provider user-info endpoint.
    pub auth_user_info_url: Url,
    /// Timeout for auth provider calls.
    pub auth_timeout: Duration,
    /// Processing webhook endpoint.
    pub upstream_webhook_url: Url,
    /// End-to-end timeout for one webhook call.
    pub upstream_timeout: Duration,
    /// Retry budget for webhook transport failures.
    pub upstream_transport_retries: u32,
    /// Artifact storage backend.
    pub storage_backend: StorageBackend,
    /// Public base URL artifacts are served from.
    pub storage_public_base_url: String,
}

impl AppConfig {
    /// Resolve the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_var("BIND_ADDR", "0.0.0.0:8080")?;
        let database_url = require_var("DATABASE_URL")?;
        let auth_user_info_url = parse_url("AUTH_USER_INFO_URL")?;
        let auth_timeout = Duration::from_secs(parse_var("AUTH_TIMEOUT_SECS", "10")?);
        let upstream_webhook_url = parse_url("UPSTREAM_WEBHOOK_URL")?;
        let upstream_timeout = Duration::from_secs(parse_var("UPSTREAM_TIMEOUT_SECS", "120")?);
        let upstream_transport_retries = parse_var("UPSTREAM_TRANSPORT_RETRIES", "0")?;
        let storage_backend = storage_backend_from_env()?;
        let storage_public_base_url = require_var("STORAGE_PUBLIC_BASE_URL")?;

        Ok(Self {
            bind_addr,
            database_url,
            auth_user_info_url,
            auth_timeout,
            upstream_webhook_url,
            upstream_timeout,
            upstream_transport_retries,
            storage_backend,
            storage_public_base_url,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::missing(name))
}

fn parse_var<T>(name: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_owned())
        .parse()
        .map_err(|err: T::Err| ConfigError::invalid(name, err.to_string()))
}

fn parse_url(name: &'static str) -> Result<Url, ConfigError> {
    require_var(name)?
        .parse()
        .map_err(|err: url::ParseError| ConfigError::invalid(name, err.to_string()))
}

fn storage_backend_from_env() -> Result<StorageBackend, ConfigError> {
    let kind = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_owned());
    match kind.as_str() {
        "s3" => Ok(StorageBackend::S3 {
            bucket: require_var("STORAGE_BUCKET")?,
        }),
        "local" => Ok(StorageBackend::Local {
            root: env::var("STORAGE_LOCAL_ROOT").unwrap_or_else(|_| "./data/artifacts".to_owned()),
        }),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(ConfigError::invalid(
            "STORAGE_BACKEND",
            format!("unknown backend `{other}`, expected s3, local or memory"),
        )),
    }
}
