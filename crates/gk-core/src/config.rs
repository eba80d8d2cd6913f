//! Configuration types and loading
//!
//! All settings come from environment variables. `AppConfig::from_lookup`
//! takes any key lookup so tests can feed values without touching the
//! process environment.

use serde::{Deserialize, Serialize};

/// Cookie that carries the session id unless `SESSION_NAME` overrides it
pub const DEFAULT_SESSION_NAME: &str = "_my_session_id";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthSettings,

    /// Database configuration
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings consumed by the authentication policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Raw `AUTH_TYPE` value; unknown values are resolved by the policy selector
    pub auth_type: String,
    /// Name of the cookie holding the session id
    pub session_name: String,
    /// Session lifetime in seconds; zero or negative means sessions never expire
    pub session_duration_seconds: i64,
    /// Paths that never require authentication
    pub excluded_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// Postgres URL; persisted sessions fall back to memory when unset
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            auth_type: "auth".to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            session_duration_seconds: 0,
            excluded_paths: default_excluded_paths(),
        }
    }
}

/// Endpoints reachable without credentials
pub fn default_excluded_paths() -> Vec<String> {
    vec![
        "/api/v1/status/".to_string(),
        "/api/v1/unauthorized/".to_string(),
        "/api/v1/forbidden/".to_string(),
        "/api/v1/auth_session/login/".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            auth: AuthSettings::default(),
            database: DatabaseSettings {
                url: None,
                max_connections: 10,
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server
        if let Some(host) = lookup("API_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            config.server.port = parse_value("API_PORT", &port)?;
        }

        // Auth
        if let Some(auth_type) = lookup("AUTH_TYPE") {
            config.auth.auth_type = auth_type;
        }
        if let Some(name) = lookup("SESSION_NAME").filter(|n| !n.is_empty()) {
            config.auth.session_name = name;
        }
        if let Some(duration) = lookup("SESSION_DURATION") {
            config.auth.session_duration_seconds = parse_value("SESSION_DURATION", &duration)?;
        }
        if let Some(paths) = lookup("AUTH_EXCLUDED_PATHS") {
            config.auth.excluded_paths = paths
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        // Database
        config.database.url = lookup("DATABASE_URL").filter(|u| !u.is_empty());
        if let Some(size) = lookup("DB_MAX_CONNECTIONS") {
            config.database.max_connections = parse_value("DB_MAX_CONNECTIONS", &size)?;
        }

        tracing::debug!(
            auth_type = %config.auth.auth_type,
            session_name = %config.auth.session_name,
            session_duration_seconds = config.auth.session_duration_seconds,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
