//! Inventory backed by a JSON file.
//!
//! The file holds an array of hosts:
//!
//! ```json
//! [
//!   {
//!     "id": "i-0a1b",
//!     "name": "web-1",
//!     "addr": "10.0.0.11",
//!     "backend_info": { "DockerPort": "2375" },
//!     "cpu_capacity": 4,
//!     "memory_capacity": 8192
//!   }
//! ]
//! ```
//!
//! It is re-read on every query so edits take effect without a restart.

use std::path::PathBuf;

use async_trait::async_trait;
use tie_core::Host;
use tracing::debug;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::filter::HostFilter;
use crate::InventoryProvider;

#[derive(Debug, Clone)]
pub struct FileInventory {
    path: PathBuf,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> DiscoveryResult<Vec<Host>> {
        let path = self.path.display().to_string();

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DiscoveryError::Read {
                path: path.clone(),
                source,
            })?;

        let hosts: Vec<Host> = serde_json::from_slice(&bytes)
            .map_err(|source| DiscoveryError::Malformed { path: path.clone(), source })?;

        debug!(%path, count = hosts.len(), "inventory loaded");
        Ok(hosts)
    }
}

#[async_trait]
impl InventoryProvider for FileInventory {
    async fn get_hosts(&self, filter: &HostFilter) -> DiscoveryResult<Vec<Host>> {
        Ok(filter.apply(self.load().await?))
    }
}
