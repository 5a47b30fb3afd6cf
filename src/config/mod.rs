//! Configuration loading and management
//!
//! Configuration is read from YAML (`CRM_CONFIG` or `config/crm.yaml`), then
//! selected values are overridden from the environment.

use crate::core::error::ConfigError;
use crate::core::query::DEFAULT_MAX_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Config file used when `CRM_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config/crm.yaml";

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server binds to (e.g., "127.0.0.1:8000")
    pub bind_addr: String,

    /// Upper bound applied to every `limit` argument
    #[validate(range(min = 1, max = 1000))]
    pub max_page_size: usize,

    /// Attach a permissive CORS layer
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            cors: false,
        }
    }
}

/// Database settings; without a URL the in-memory store is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,

    #[validate(range(min = 1))]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQLConfig {
    /// Serve GraphiQL on `GET /graphql`
    pub playground: bool,
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self { playground: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. "info,crm=debug"
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub database: DatabaseConfig,

    pub graphql: GraphQLConfig,

    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            file: None,
            message: e.to_string(),
        })?;
        config.validate_config()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                file: Some(path.display().to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load from `CRM_CONFIG` (or the default path) and apply environment
    /// overrides.
    ///
    /// A missing default file yields the defaults; a missing file named by
    /// `CRM_CONFIG` is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CRM_CONFIG") {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate_config()?;
        Ok(config)
    }

    /// Override values from `CRM_BIND_ADDR`, `DATABASE_URL` and `RUST_LOG`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("CRM_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log.filter = filter;
        }
    }

    /// Check value ranges
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
    }
}
