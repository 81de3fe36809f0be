//! In-process execution backend.
//!
//! Keeps workloads in a map keyed by host id. Launching goes through the
//! same capacity ledger as a real daemon, so placement sees exactly what it
//! would see against Docker. Hosts can be marked as failing to exercise the
//! error paths of callers.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::info;

use tie_core::{Host, HostId, Workload, WorkloadRequest, ledger};

use crate::ExecutionBackend;
use crate::error::{BackendError, BackendResult};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    workloads: RwLock<HashMap<HostId, Vec<Workload>>>,
    failing: RwLock<HashSet<HostId>>,
    next_id: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `host` with already running workloads.
    pub fn seed(&self, host: &Host, workloads: Vec<Workload>) {
        self.write_workloads()
            .entry(host.id.clone())
            .or_default()
            .extend(workloads);
    }

    /// Make every call against `host_id` fail until [`Self::recover`].
    pub fn fail_host(&self, host_id: impl Into<HostId>) {
        self.failing
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(host_id.into());
    }

    pub fn recover(&self, host_id: &str) {
        self.failing
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(host_id);
    }

    fn check_available(&self, host: &Host) -> BackendResult<()> {
        let failing = self.failing.read().unwrap_or_else(|e| e.into_inner());
        if failing.contains(&host.id) {
            return Err(BackendError::Unavailable(format!("host {} is failing", host.id)));
        }
        Ok(())
    }

    fn write_workloads(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<HostId, Vec<Workload>>> {
        self.workloads.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ExecutionBackend for MemoryBackend {
    async fn list_workloads(&self, host: &Host) -> BackendResult<Vec<Workload>> {
        self.check_available(host)?;

        let workloads = self.workloads.read().unwrap_or_else(|e| e.into_inner());
        let mut on_host = workloads.get(&host.id).cloned().unwrap_or_default();

        // Capacity always comes from the ledger, as it would from a daemon.
        for workload in &mut on_host {
            let capacity = ledger::decode(&workload.env)?;
            workload.cpu_capacity = capacity.cpu;
            workload.memory_capacity = capacity.memory;
        }
        Ok(on_host)
    }

    async fn launch_workload(
        &self,
        host: &Host,
        req: &WorkloadRequest,
    ) -> BackendResult<Workload> {
        self.check_available(host)?;

        let seq = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let env = ledger::encode(req);
        let capacity = ledger::decode(&env)?;

        let workload = Workload {
            id: format!("mem-{seq}"),
            name: format!("workload-{seq}"),
            path: req.image.clone(),
            args: req.cmd.clone(),
            env,
            host: host.to_ref(),
            cpu_capacity: capacity.cpu,
            memory_capacity: capacity.memory,
        };

        self.write_workloads()
            .entry(host.id.clone())
            .or_default()
            .push(workload.clone());

        info!(host = %host.id, workload = %workload.id, image = %req.image, "workload launched");
        Ok(workload)
    }
}
