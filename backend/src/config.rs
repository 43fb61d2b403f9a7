//! Environment-derived application configuration.
//!
//! All knobs come from environment variables with development-friendly
//! defaults. A missing `MONGODB_URL` is not an error: the server falls back
//! to in-memory adapters so the app can run without a database.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE: &str = "forum";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Configuration failures reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddress { value: String, message: String },
    #[error("TOKEN_SECRET must be set outside debug builds")]
    MissingTokenSecret,
    #[error("invalid TOKEN_TTL_SECONDS {value:?}")]
    InvalidTokenTtl { value: String },
}

/// Application configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket the HTTP server binds to (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// MongoDB connection string (`MONGODB_URL`); `None` selects the
    /// in-memory adapters.
    pub mongodb_url: Option<String>,
    /// Database name within the deployment (`MONGODB_DATABASE`).
    pub database: String,
    /// Directory upload artifacts are stored in (`UPLOAD_DIR`).
    pub upload_dir: PathBuf,
    /// Shared secret for signing bearer tokens (`TOKEN_SECRET`).
    pub token_secret: String,
    /// Token lifetime in seconds (`TOKEN_TTL_SECONDS`).
    pub token_ttl_seconds: i64,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Debug builds generate an ephemeral token secret when `TOKEN_SECRET`
    /// is unset; release builds refuse to start without one so a restart
    /// cannot silently invalidate every session.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND.to_owned());
        let bind_addr = bind_raw
            .parse()
            .map_err(|error: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                value: bind_raw,
                message: error.to_string(),
            })?;

        let token_secret = match env::var("TOKEN_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                warn!("TOKEN_SECRET unset; using an ephemeral secret (dev only)");
                uuid::Uuid::new_v4().to_string()
            }
            Err(_) => return Err(ConfigError::MissingTokenSecret),
        };

        let token_ttl_seconds = match env::var("TOKEN_TTL_SECONDS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidTokenTtl { value: raw })?,
            Err(_) => DEFAULT_TOKEN_TTL_SECONDS,
        };

        Ok(Self {
            bind_addr,
            mongodb_url: env::var("MONGODB_URL").ok().filter(|url| !url.is_empty()),
            database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE.to_owned()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            token_secret,
            token_ttl_seconds,
        })
    }
}
