//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, ServerConfig};

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_DB_CONNECT_TIMEOUT_SECONDS, DEFAULT_DB_MAX_CONNECTIONS,
    DEFAULT_DB_MIN_CONNECTIONS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(DEFAULT_DB_MIN_CONNECTIONS),
                connect_timeout_seconds: parse_var("DATABASE_CONNECT_TIMEOUT_SECONDS")
                    .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECONDS),
                sql_logging: parse_var("DATABASE_SQL_LOGGING").unwrap_or(false),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            },
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        self.server.addr()
    }
}

/// Read and parse an environment variable, ignoring unset or malformed values.
fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring malformed {}={:?}", key, raw);
            None
        }
    }
}
