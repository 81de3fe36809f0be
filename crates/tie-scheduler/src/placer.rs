//! First-fit placement.
//!
//! Hosts are tried in inventory order. For each one the resident workloads
//! are listed and their reserved capacity summed; the first host where the
//! sum plus the request stays within both the cpu and the memory capacity
//! wins. A host whose listing fails is skipped, not fatal.
//!
//! There is deliberately no scoring: no best fit, affinity, priority or
//! preemption.

use tracing::{debug, info, warn};

use tie_backend::ExecutionBackend;
use tie_core::{Capacity, Host, Workload, WorkloadRequest};

use crate::error::{SchedulerError, SchedulerResult};

/// Capacity already reserved on a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostUsage {
    pub cpu: u64,
    pub memory: u64,
}

impl HostUsage {
    pub fn of(workloads: &[Workload]) -> Self {
        workloads.iter().fold(Self::default(), |usage, w| HostUsage {
            cpu: usage.cpu + u64::from(w.cpu_capacity),
            memory: usage.memory + u64::from(w.memory_capacity),
        })
    }

    /// Usage after adding `request`.
    pub fn with(self, request: Capacity) -> Self {
        HostUsage {
            cpu: self.cpu + u64::from(request.cpu),
            memory: self.memory + u64::from(request.memory),
        }
    }

    pub fn fits(&self, host: &Host) -> bool {
        self.cpu <= u64::from(host.cpu_capacity) && self.memory <= u64::from(host.memory_capacity)
    }
}

/// The first host, in inventory order, with room for `request`.
pub async fn find_available_host(
    backend: &dyn ExecutionBackend,
    hosts: &[Host],
    request: &WorkloadRequest,
) -> SchedulerResult<Host> {
    let wanted = Capacity::of_request(request);

    for host in hosts {
        let workloads = match backend.list_workloads(host).await {
            Ok(w) => w,
            Err(e) => {
                warn!(host = %host.id, error = %e, "skipping host during placement");
                continue;
            }
        };

        let projected = HostUsage::of(&workloads).with(wanted);
        if projected.fits(host) {
            info!(
                host = %host.id,
                cpu = projected.cpu,
                memory = projected.memory,
                "host selected"
            );
            return Ok(host.clone());
        }

        debug!(
            host = %host.id,
            projected_cpu = projected.cpu,
            cpu_capacity = host.cpu_capacity,
            projected_memory = projected.memory,
            memory_capacity = host.memory_capacity,
            "host lacks capacity"
        );
    }

    Err(SchedulerError::NoAvailableHost {
        candidates: hosts.len(),
    })
}
