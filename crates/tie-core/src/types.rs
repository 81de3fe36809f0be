//! Domain types for dockertie.
//!
//! Hosts come from an inventory provider, workloads from an execution
//! backend. Neither is persisted here: every value is a snapshot of a live
//! query and is dropped once the request that produced it completes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a host in the inventory.
pub type HostId = String;

/// Unique identifier for a workload, as assigned by the backend.
pub type WorkloadId = String;

// ── Host ──────────────────────────────────────────────────────────

/// A compute node advertising capacity for workloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    pub id: HostId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Network address the execution backend is reached on.
    pub addr: String,
    /// Backend-specific connection parameters (e.g. `DockerPort`).
    #[serde(default)]
    pub backend_info: HashMap<String, String>,
    #[serde(default)]
    pub cpu_capacity: u32,
    #[serde(default)]
    pub memory_capacity: u32,
}

impl Host {
    /// Display-only reference to this host.
    pub fn to_ref(&self) -> HostRef {
        HostRef {
            id: self.id.clone(),
            name: self.name.clone(),
            addr: self.addr.clone(),
        }
    }
}

/// The host a workload was observed on.
///
/// Carries just enough to render the workload; it is not a handle to the
/// inventory and is never used for placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HostRef {
    pub id: HostId,
    pub name: String,
    pub addr: String,
}

// ── Workload ──────────────────────────────────────────────────────

/// A containerized process running on a host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workload {
    pub id: WorkloadId,
    pub name: String,
    pub path: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub host: HostRef,
    /// Reserved cpu, recovered from `env` by the capacity ledger.
    pub cpu_capacity: u32,
    /// Reserved memory, recovered from `env` by the capacity ledger.
    pub memory_capacity: u32,
}

// ── WorkloadRequest ───────────────────────────────────────────────

/// A request to launch a new workload somewhere in the pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WorkloadRequest {
    /// Image (or binary) reference to run.
    pub image: String,
    #[serde(default)]
    pub cmd: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Free-form labels, folded into the environment at launch.
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub cpu_capacity: u32,
    #[serde(default)]
    pub memory_capacity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_defaults_optional_fields() {
        let host: Host = serde_json::from_str(r#"{"id": "h1", "addr": "10.0.0.1"}"#).unwrap();

        assert_eq!(host.id, "h1");
        assert!(host.name.is_empty());
        assert!(host.tags.is_empty());
        assert!(host.backend_info.is_empty());
        assert_eq!(host.cpu_capacity, 0);
        assert_eq!(host.memory_capacity, 0);
    }

    #[test]
    fn request_needs_only_an_image() {
        let req: WorkloadRequest = serde_json::from_str(r#"{"image": "nginx:1.27"}"#).unwrap();

        assert_eq!(req.image, "nginx:1.27");
        assert!(req.cmd.is_empty());
        assert_eq!(req.cpu_capacity, 0);
    }

    #[test]
    fn request_without_image_is_rejected() {
        let res: Result<WorkloadRequest, _> = serde_json::from_str(r#"{"cmd": ["sh"]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn host_ref_copies_display_fields() {
        let host = Host {
            id: "h1".to_string(),
            name: "web-1".to_string(),
            tags: HashMap::new(),
            addr: "10.0.0.1".to_string(),
            backend_info: HashMap::new(),
            cpu_capacity: 4,
            memory_capacity: 8,
        };

        let r = host.to_ref();
        assert_eq!(r.id, "h1");
        assert_eq!(r.name, "web-1");
        assert_eq!(r.addr, "10.0.0.1");
    }
}
