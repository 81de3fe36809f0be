//! Daemon configuration (`dockertie.toml`).
//!
//! Loaded once at startup, validated, then shared read-only with every
//! component constructor.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::Host;

/// Default port of the Docker Engine HTTP API.
pub const DEFAULT_DOCKER_PORT: u16 = 4243;

/// Default HTTP port the daemon listens on.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Address to bind; empty means all interfaces.
    #[serde(default)]
    pub bind: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: String::new(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

impl ServerConfig {
    /// `bind:port`, with an empty bind meaning `0.0.0.0`.
    pub fn listen_addr(&self) -> String {
        let bind = if self.bind.is_empty() {
            "0.0.0.0"
        } else {
            self.bind.as_str()
        };
        format!("{bind}:{}", self.port)
    }
}

/// Which execution backend to talk to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Docker Engine HTTP API on each host.
    Docker {
        /// Port used when a host has no `DockerPort` entry.
        #[serde(default = "default_docker_port")]
        default_port: u16,
        /// Per-request deadline; `None` waits indefinitely.
        #[serde(default)]
        request_timeout_secs: Option<u64>,
    },
    /// In-process backend, for dry runs.
    Memory,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Docker {
            default_port: DEFAULT_DOCKER_PORT,
            request_timeout_secs: Some(30),
        }
    }
}

/// Where the host inventory comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InventoryConfig {
    /// JSON array of hosts, re-read on every query.
    File { path: PathBuf },
    /// Hosts listed inline in the config file.
    Static {
        #[serde(default)]
        hosts: Vec<Host>,
    },
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig::File {
            path: PathBuf::new(),
        }
    }
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Reject configurations the daemon cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }

        if let BackendConfig::Docker { default_port, .. } = &self.backend {
            if *default_port == 0 {
                return Err(ConfigError::Invalid(
                    "backend.default_port must be non-zero".into(),
                ));
            }
        }

        match &self.inventory {
            InventoryConfig::File { path } if path.as_os_str().is_empty() => Err(
                ConfigError::Invalid("inventory.path is required for the file inventory".into()),
            ),
            InventoryConfig::Static { hosts } if hosts.is_empty() => Err(ConfigError::Invalid(
                "inventory.hosts must list at least one host".into(),
            )),
            _ => Ok(()),
        }
    }
}

fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

fn default_docker_port() -> u16 {
    DEFAULT_DOCKER_PORT
}
