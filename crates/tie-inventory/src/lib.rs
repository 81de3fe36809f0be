//! tie-inventory — resolves the current set of hosts.
//!
//! The daemon never keeps its own copy of the inventory: every API call asks
//! an [`InventoryProvider`] for a fresh snapshot. Providers are a closed set
//! chosen at startup from [`InventoryConfig`].
//!
//! # Components
//!
//! - **`filter`** — `HostFilter`, the id-set selection shared by providers
//! - **`file`** — JSON file on disk, re-read on every query
//! - **`static_list`** — hosts listed inline in the config

pub mod error;
pub mod file;
pub mod filter;
pub mod static_list;

use std::sync::Arc;

use async_trait::async_trait;
use tie_core::{Host, InventoryConfig};

pub use error::{DiscoveryError, DiscoveryResult};
pub use file::FileInventory;
pub use filter::HostFilter;
pub use static_list::StaticInventory;

/// Source of truth for which hosts exist.
#[async_trait]
pub trait InventoryProvider: Send + Sync + std::fmt::Debug {
    /// Hosts selected by `filter`, in the provider's natural order.
    async fn get_hosts(&self, filter: &HostFilter) -> DiscoveryResult<Vec<Host>>;
}

/// Build the provider selected by the daemon configuration.
pub fn from_config(config: &InventoryConfig) -> Arc<dyn InventoryProvider> {
    match config {
        InventoryConfig::File { path } => Arc::new(FileInventory::new(path.clone())),
        InventoryConfig::Static { hosts } => Arc::new(StaticInventory::new(hosts.clone())),
    }
}
