//! Command-line overrides layered on top of the config file.

use std::path::PathBuf;

use clap::Args;

use tie_core::{BackendConfig, DaemonConfig, InventoryConfig};

#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Address to bind (default: all interfaces).
    #[arg(long)]
    pub bind: Option<String>,

    /// HTTP port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Docker API port for hosts without a `DockerPort` entry.
    #[arg(long)]
    pub docker_port: Option<u16>,

    /// JSON inventory file; selects the file inventory.
    #[arg(long)]
    pub inventory_path: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut DaemonConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(port) = self.docker_port {
            match &mut config.backend {
                BackendConfig::Docker { default_port, .. } => *default_port = port,
                BackendConfig::Memory => {
                    tracing::warn!("--docker-port ignored: backend is not docker");
                }
            }
        }
        if let Some(path) = &self.inventory_path {
            config.inventory = InventoryConfig::File { path: path.clone() };
        }
    }
}
