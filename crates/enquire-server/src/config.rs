//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `./enquire.db`
    pub database_path: PathBuf,

    /// Static bearer token that acts as a staff member.
    /// Env: `ADMIN_TOKEN`
    /// Default: unset (only staff sessions are privileged).
    pub admin_token: Option<String>,

    /// Token-bucket refill rate per client IP on validation routes.
    /// Env: `VALIDATION_RATE`
    /// Default: `10` per second
    pub validation_rate: f64,

    /// Token-bucket capacity per client IP on validation routes.
    /// Env: `VALIDATION_BURST`
    /// Default: `30`
    pub validation_burst: f64,

    /// Outbound queue depth of each notification socket.
    /// Env: `NOTIFY_BUFFER`
    /// Default: `64`
    pub notify_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            database_path: PathBuf::from("./enquire.db"),
            admin_token: None,
            validation_rate: 10.0,
            validation_burst: 30.0,
            notify_buffer: 64,
        }
    }
}

// The admin token must never reach the logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "***"))
            .field("validation_rate", &self.validation_rate)
            .field("validation_burst", &self.validation_burst)
            .field("notify_buffer", &self.notify_buffer)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            if !path.trim().is_empty() {
                config.database_path = PathBuf::from(path);
            }
        }

        if let Some(token) = lookup("ADMIN_TOKEN") {
            if !token.is_empty() {
                config.admin_token = Some(token);
            }
        }

        if let Some(val) = lookup("VALIDATION_RATE") {
            match val.parse::<f64>() {
                Ok(rate) if rate > 0.0 => config.validation_rate = rate,
                _ => tracing::warn!(value = %val, "Invalid VALIDATION_RATE, using default"),
            }
        }

        if let Some(val) = lookup("VALIDATION_BURST") {
            match val.parse::<f64>() {
                Ok(burst) if burst >= 1.0 => config.validation_burst = burst,
                _ => tracing::warn!(value = %val, "Invalid VALIDATION_BURST, using default"),
            }
        }

        if let Some(val) = lookup("NOTIFY_BUFFER") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.notify_buffer = n,
                _ => tracing::warn!(value = %val, "Invalid NOTIFY_BUFFER, using default"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
