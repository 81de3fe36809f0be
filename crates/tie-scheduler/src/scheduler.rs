//! Request-level operations over the inventory and the backend.
//!
//! Each method resolves a fresh host snapshot, then hands it to the backend,
//! the aggregator or the placer. Nothing is cached between calls.

use std::sync::Arc;

use tracing::info;

use tie_backend::ExecutionBackend;
use tie_core::{Host, Workload, WorkloadRequest};
use tie_inventory::{HostFilter, InventoryProvider};

use crate::error::{SchedulerError, SchedulerResult};
use crate::fanout::collect_all;
use crate::placer::find_available_host;

#[derive(Debug, Clone)]
pub struct Scheduler {
    inventory: Arc<dyn InventoryProvider>,
    backend: Arc<dyn ExecutionBackend>,
}

impl Scheduler {
    pub fn new(inventory: Arc<dyn InventoryProvider>, backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { inventory, backend }
    }

    /// The full inventory.
    pub async fn hosts(&self) -> SchedulerResult<Vec<Host>> {
        Ok(self.inventory.get_hosts(&HostFilter::All).await?)
    }

    /// Workloads on a single host. Unknown ids are [`SchedulerError::HostNotFound`].
    pub async fn host_workloads(&self, host_id: &str) -> SchedulerResult<Vec<Workload>> {
        let hosts = self.inventory.get_hosts(&HostFilter::one(host_id)).await?;
        let host = hosts
            .first()
            .ok_or_else(|| SchedulerError::HostNotFound(host_id.to_string()))?;

        Ok(self.backend.list_workloads(host).await?)
    }

    /// Workloads across the whole inventory. Unreachable hosts are left out.
    pub async fn all_workloads(&self) -> SchedulerResult<Vec<Workload>> {
        let hosts = self.hosts().await?;
        Ok(collect_all(Arc::clone(&self.backend), hosts).await)
    }

    /// Place `request` on the first host with room and launch it there.
    pub async fn launch(&self, request: &WorkloadRequest) -> SchedulerResult<Workload> {
        let hosts = self.hosts().await?;
        let host = find_available_host(self.backend.as_ref(), &hosts, request).await?;

        let workload = self.backend.launch_workload(&host, request).await?;
        info!(
            host = %host.id,
            workload = %workload.id,
            cpu = request.cpu_capacity,
            memory = request.memory_capacity,
            "workload placed"
        );
        Ok(workload)
    }
}
