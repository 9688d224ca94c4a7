use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the quote service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

/// Connection parameters for the PostgreSQL pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// The connection string, usually supplied as `DATABASE_URL`.
    #[serde(default)]
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout_secs: u64,
}

impl DatabaseSettings {
    /// Returns the connection string, or an error if none was configured.
    pub fn url(&self) -> Result<&str, ConfigError> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(ConfigError::ValidationError(
                "DATABASE_URL must be set.".to_string(),
            )),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    /// The listening port, usually supplied as `PORT`.
    pub port: u16,
    /// Directory served for any path the router does not match.
    pub static_dir: PathBuf,
    /// Map error kinds to distinct status codes instead of a flat 500.
    pub detailed_errors: bool,
}

impl ServerSettings {
    /// The address to listen on. `host` may be an IP address or a hostname
    /// such as `localhost`; it is resolved when the listener binds.
    pub fn bind_address(&self) -> Result<(&str, u16), ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        Ok((host, self.port))
    }
}
