use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// Environment overrides, used instead of the process environment when present
type Overrides = Option<config::Map<String, String>>;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub orders: OrderConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

/// PostgreSQL connection settings, read from `FOOD_DB_*`
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfig {
    #[serde(default = "default_enforce_status_transitions")]
    pub enforce_status_transitions: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
            .finish()
    }
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = Config {
            server: ServerConfig::from_env(&overrides)?,
            database: DatabaseConfig::from_env(&overrides)?,
            orders: OrderConfig::from_env(&overrides)?,
            observability: ObservabilityConfig::from_env(&overrides)?,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating configuration");

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.database.host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Database host cannot be empty".to_string(),
            });
        }

        if self.database.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Database name cannot be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError {
                message: "Database pool size cannot be 0".to_string(),
            });
        }

        if self.database.acquire_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Database acquire timeout cannot be 0".to_string(),
            });
        }

        info!("Configuration validation completed");
        Ok(())
    }
}

fn load_section<T>(prefix: &str, section: &str, overrides: &Overrides) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
{
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(prefix).source(overrides.clone()))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl ServerConfig {
    fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        // The listening port comes from the conventional unprefixed PORT variable
        let port = match overrides {
            Some(vars) => vars.get("PORT").cloned(),
            None => std::env::var("PORT").ok(),
        };

        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("FOOD").source(overrides.clone()))
            .set_override_option("port", port)
            .and_then(|builder| builder.build())
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load server config: {}", e),
            })?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to deserialize server config: {}", e),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        load_section("FOOD_DB", "database", overrides)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl OrderConfig {
    fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        load_section("FOOD", "orders", overrides)
    }
}

impl ObservabilityConfig {
    fn from_env(overrides: &Overrides) -> Result<Self, ConfigError> {
        load_section("FOOD", "observability", overrides)
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    3000
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> usize {
    1024 * 1024 // 1MB
}

pub(crate) fn default_db_host() -> String {
    "localhost".to_string()
}

pub(crate) fn default_db_port() -> u16 {
    5432
}

pub(crate) fn default_db_user() -> String {
    "root".to_string()
}

pub(crate) fn default_db_password() -> String {
    "password".to_string()
}

pub(crate) fn default_db_name() -> String {
    "food_db".to_string()
}

pub(crate) fn default_max_connections() -> u32 {
    10
}

pub(crate) fn default_acquire_timeout() -> u64 {
    5
}

pub(crate) fn default_enforce_status_transitions() -> bool {
    true
}

pub(crate) fn default_service_name() -> String {
    "food-orders".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
