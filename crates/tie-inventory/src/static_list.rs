//! Inventory listed inline in the daemon configuration.

use async_trait::async_trait;
use tie_core::Host;

use crate::error::DiscoveryResult;
use crate::filter::HostFilter;
use crate::InventoryProvider;

/// Fixed host list, handed out as a fresh copy on every query.
#[derive(Debug, Clone)]
pub struct StaticInventory {
    hosts: Vec<Host>,
}

impl StaticInventory {
    pub fn new(hosts: Vec<Host>) -> Self {
        Self { hosts }
    }
}

#[async_trait]
impl InventoryProvider for StaticInventory {
    async fn get_hosts(&self, filter: &HostFilter) -> DiscoveryResult<Vec<Host>> {
        Ok(filter.apply(self.hosts.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn host(id: &str) -> Host {
        Host {
            id: id.to_string(),
            name: format!("{id}.local"),
            tags: HashMap::new(),
            addr: "10.0.0.1".to_string(),
            backend_info: HashMap::new(),
            cpu_capacity: 4,
            memory_capacity: 8,
        }
    }

    #[tokio::test]
    async fn returns_full_inventory_without_filter() {
        let inventory = StaticInventory::new(vec![host("h1"), host("h2"), host("h3")]);
        let hosts = inventory.get_hosts(&HostFilter::All).await.unwrap();
        assert_eq!(hosts.len(), 3);
    }

    #[tokio::test]
    async fn filter_selects_single_host() {
        let inventory = StaticInventory::new(vec![host("h1"), host("h2"), host("h3")]);
        let hosts = inventory.get_hosts(&HostFilter::one("h2")).await.unwrap();
        assert_eq!(hosts, vec![host("h2")]);
    }
}
