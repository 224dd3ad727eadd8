use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::Credential;
use crate::use_cases::DispatchTimeouts;

// Runtime configuration, loaded once at startup and shared read-only.

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default)]
    pub log_level: String,
    pub database: DatabaseConfig,
    pub operator: OperatorConfig,
}

// Connection settings shared by every shard database; the schema name comes per request.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub query_timeout_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OperatorConfig {
    pub user: String,
    pub password: String,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_db_port() -> u16 {
    3306
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operator.user.is_empty() {
            return Err(ConfigError::Invalid("operator.user must not be empty".into()));
        }
        if self.operator.password.is_empty() {
            return Err(ConfigError::Invalid(
                "operator.password must not be empty".into(),
            ));
        }
        if self.database.host.is_empty() {
            return Err(ConfigError::Invalid("database.host must not be empty".into()));
        }
        if self.database.connect_timeout_ms == 0 || self.database.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database timeouts must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn credential(&self) -> Credential {
        Credential {
            user: self.operator.user.clone(),
            secret: self.operator.password.clone(),
        }
    }

    pub fn timeouts(&self) -> DispatchTimeouts {
        DispatchTimeouts {
            connect: Duration::from_millis(self.database.connect_timeout_ms),
            query: Duration::from_millis(self.database.query_timeout_ms),
        }
    }

    // Default tracing filter; unknown levels fall back to errors only.
    pub fn log_filter(&self) -> &'static str {
        match self.log_level.as_str() {
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            _ => "error",
        }
    }
}
