//! # Runtime Configuration
//!
//! Built in three layers, later layers winning:
//!
//! 1. Defaults
//! 2. The JSON file named by `BB_CONFIG`, if set
//! 3. `BB_HTTP_HOST`, `BB_HTTP_PORT`, `BB_STORAGE`, `BB_DATA_DIR`,
//!    `BB_ADMIN_TOKEN`
//!
//! The gateway section is validated last.

use bb_05_api_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_CONFIG: &str = "BB_CONFIG";
pub const ENV_HTTP_HOST: &str = "BB_HTTP_HOST";
pub const ENV_HTTP_PORT: &str = "BB_HTTP_PORT";
pub const ENV_STORAGE: &str = "BB_STORAGE";
pub const ENV_DATA_DIR: &str = "BB_DATA_DIR";
pub const ENV_ADMIN_TOKEN: &str = "BB_ADMIN_TOKEN";

/// Where documents are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lost on restart.
    #[default]
    Memory,
    /// Requires the `rocksdb` feature.
    RocksDb,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::RocksDb => "rocksdb",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "rocksdb" => Ok(StorageBackend::RocksDb),
            other => Err(ConfigError::InvalidValue {
                key: ENV_STORAGE,
                value: other.to_string(),
                expected: "memory or rocksdb",
            }),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub storage: StorageBackend,
    /// Directory of the RocksDB database.
    pub data_dir: PathBuf,
    pub gateway: GatewayConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {key} '{value}' (expected {expected})")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Gateway(#[from] bb_05_api_gateway::domain::ConfigError),
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load with `lookup` standing in for the environment.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match non_empty(lookup(ENV_CONFIG)) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.gateway.validate()?;
        Ok(config)
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = non_empty(lookup(ENV_HTTP_HOST)) {
            self.gateway.http.host = host.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_HTTP_HOST,
                value: host.clone(),
                expected: "an IP address",
            })?;
        }
        if let Some(port) = non_empty(lookup(ENV_HTTP_PORT)) {
            self.gateway.http.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_HTTP_PORT,
                value: port.clone(),
                expected: "a port number",
            })?;
        }
        if let Some(storage) = non_empty(lookup(ENV_STORAGE)) {
            self.storage = storage.parse()?;
        }
        if let Some(dir) = non_empty(lookup(ENV_DATA_DIR)) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(token) = non_empty(lookup(ENV_ADMIN_TOKEN)) {
            self.gateway.auth.admin_token = Some(token);
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
