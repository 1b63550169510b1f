//! Application configuration
//!
//! Loaded from `config/<env>.yaml`, then overridden by environment variables
//! (deployment-supplied credentials and service URLs), then validated. Any
//! missing required value aborts startup.

use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Accepted values for `database.ssl_mode` (libpq names).
pub const SSL_MODES: &[&str] = &[
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub downstream: DownstreamConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// PostgreSQL connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 5432,
            name: String::new(),
            user: String::new(),
            password: String::new(),
            ssl_mode: "disable".to_string(),
            max_connections: 25,
            run_migrations: false,
        }
    }
}

/// Shipping-status provider and cart service endpoints
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DownstreamConfig {
    pub shipping_base_url: String,
    pub shipping_timeout_ms: u64,
    pub cart_base_url: String,
    pub cart_timeout_ms: u64,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            shipping_base_url: String::new(),
            shipping_timeout_ms: 5000,
            cart_base_url: String::new(),
            cart_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
}

impl AppConfig {
    /// Load `config/<env>.yaml`, apply environment overrides and validate.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override file values with whatever `lookup` returns for the well-known
    /// environment keys. Empty values are ignored; numeric keys that do not
    /// parse are rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = get("DB_PORT") {
            self.database.port = parse_number("DB_PORT", &v)?;
        }
        if let Some(v) = get("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = get("DB_USER") {
            self.database.user = v;
        }
        if let Some(v) = get("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = get("DB_SSLMODE") {
            self.database.ssl_mode = v;
        }
        if let Some(v) = get("DB_POOL_MAX_CONNECTIONS") {
            self.database.max_connections = parse_number("DB_POOL_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = get("SHIPPING_SERVICE_URL") {
            self.downstream.shipping_base_url = v;
        }
        if let Some(v) = get("CART_SERVICE_URL") {
            self.downstream.cart_base_url = v;
        }
        if let Some(v) = get("JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = get("PORT") {
            self.gateway.port = parse_number("PORT", &v)?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let db = &self.database;
        require(&db.host, "DB_HOST")?;
        require(&db.name, "DB_NAME")?;
        require(&db.user, "DB_USER")?;
        require(&db.password, "DB_PASSWORD")?;

        if !SSL_MODES.contains(&db.ssl_mode.as_str()) {
            return Err(ConfigError::Invalid {
                field: "DB_SSLMODE",
                reason: format!("'{}' is not one of {:?}", db.ssl_mode, SSL_MODES),
            });
        }
        if db.max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "DB_POOL_MAX_CONNECTIONS",
                reason: "must be greater than zero".to_string(),
            });
        }

        require(&self.downstream.shipping_base_url, "SHIPPING_SERVICE_URL")?;
        require(&self.downstream.cart_base_url, "CART_SERVICE_URL")?;
        require(&self.auth.jwt_secret, "JWT_SECRET")?;
        Ok(())
    }
}

fn parse_number<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            field,
            reason: format!("'{}': {}", value, e),
        })
}

fn require(value: &str, name: &'static str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing(name))
    } else {
        Ok(())
    }
}
