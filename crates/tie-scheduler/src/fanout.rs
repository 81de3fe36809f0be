//! Fan-out aggregation of workloads across hosts.
//!
//! One task per host lists its workloads and pushes the batch into a shared
//! channel. The coordinator drains the channel until every task has dropped
//! its sender, then joins the tasks. A host that fails (or whose task
//! panics) is logged and contributes nothing; the aggregate still succeeds.
//!
//! Output order is arrival order and is not deterministic.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use tie_backend::ExecutionBackend;
use tie_core::{Host, Workload};

/// Every workload on every reachable host.
pub async fn collect_all(backend: Arc<dyn ExecutionBackend>, hosts: Vec<Host>) -> Vec<Workload> {
    let host_count = hosts.len();
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<Workload>>();
    let mut tasks = JoinSet::new();

    for host in hosts {
        let backend = Arc::clone(&backend);
        let tx = tx.clone();
        tasks.spawn(async move {
            match backend.list_workloads(&host).await {
                Ok(workloads) => {
                    debug!(host = %host.id, count = workloads.len(), "host listed");
                    // The receiver outlives every task.
                    let _ = tx.send(workloads);
                }
                Err(e) => {
                    warn!(host = %host.id, error = %e, "dropping host from aggregate");
                }
            }
        });
    }
    drop(tx);

    let mut workloads = Vec::new();
    while let Some(batch) = rx.recv().await {
        workloads.extend(batch);
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "host listing task failed");
        }
    }

    debug!(hosts = host_count, workloads = workloads.len(), "aggregate collected");
    workloads
}
