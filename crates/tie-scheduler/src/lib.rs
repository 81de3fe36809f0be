//! tie-scheduler — workload aggregation and placement.
//!
//! Sits between the API and the two pluggable collaborators:
//!
//! ```text
//! Scheduler
//!   ├── InventoryProvider (which hosts exist)
//!   ├── ExecutionBackend  (what runs on a host, launch new workloads)
//!   ├── fanout::collect_all         (one task per host, best effort)
//!   └── placer::find_available_host (first fit, inventory order)
//! ```
//!
//! Aggregation is the only path that swallows per-host failures. Every other
//! operation returns the first error it meets.

pub mod error;
pub mod fanout;
pub mod placer;
pub mod scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use fanout::collect_all;
pub use placer::{HostUsage, find_available_host};
pub use scheduler::Scheduler;
