//! Server configuration.
//!
//! Settings come from an optional `elephant-server.toml` and are then
//! overridden by environment variables:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//! max_body_bytes = 52428800
//!
//! [units]
//! time = "s"
//! rate = "Hz"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use crate::units::{UnitError, UnitOverrides, UnitRegistry};

/// Name of the configuration file looked up in the standard locations.
pub const CONFIG_FILE_NAME: &str = "elephant-server.toml";

pub const ENV_HOST: &str = "ELEPHANT_SERVER_HOST";
pub const ENV_PORT: &str = "ELEPHANT_SERVER_PORT";
pub const ENV_CONFIG: &str = "ELEPHANT_SERVER_CONFIG";

const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid default units: {0}")]
    Units(#[from] UnitError),

    #[error("Cannot resolve bind address {0}")]
    Address(String),
}

/// Effective server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// Units used when a request does not name its own.
    pub default_units: UnitOverrides,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            default_units: UnitOverrides::default(),
        }
    }
}

/// On-disk layout of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    units: UnitOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    max_body_bytes: Option<usize>,
}

impl ServerConfig {
    /// Load settings from a TOML file; missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let defaults = Self::default();
        let config = Self {
            host: file.server.host.unwrap_or(defaults.host),
            port: file.server.port.unwrap_or(defaults.port),
            max_body_bytes: file.server.max_body_bytes.unwrap_or(defaults.max_body_bytes),
            default_units: file.units,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load `elephant-server.toml` from the current or `backend/` directory.
    ///
    /// Returns `Ok(None)` when no file exists in either place.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
        ];
        match search_paths.iter().find(|path| path.exists()) {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Resolve the effective configuration.
    ///
    /// `ELEPHANT_SERVER_CONFIG` names the file explicitly; otherwise the
    /// standard locations are searched. `ELEPHANT_SERVER_HOST` and
    /// `ELEPHANT_SERVER_PORT` take precedence over the file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::from_default_location()?.unwrap_or_default(),
        };

        if let Ok(host) = std::env::var(ENV_HOST) {
            if host.trim().is_empty() {
                return Err(ConfigError::InvalidEnv {
                    name: ENV_HOST,
                    value: host,
                    reason: "host must not be empty".to_string(),
                });
            }
            config.host = host;
        }
        if let Ok(port) = std::env::var(ENV_PORT) {
            config.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(config)
    }

    /// First socket address `host:port` resolves to.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let target = format!("{}:{}", self.host, self.port);
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::Address(format!("{}: {}", target, e)))?
            .next()
            .ok_or(ConfigError::Address(target))
    }

    /// Configured default units must build a valid registry.
    fn validate(&self) -> Result<(), ConfigError> {
        UnitRegistry::new(&self.default_units)?;
        Ok(())
    }
}
