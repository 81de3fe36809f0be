//! tie-core — shared types for dockertie.
//!
//! Everything the other crates agree on lives here:
//!
//! - **`types`** — `Host`, `Workload`, `WorkloadRequest`
//! - **`ledger`** — capacity encoding in a workload's environment
//! - **`config`** — the daemon's immutable startup configuration
//! - **`error`** — ledger and configuration errors

pub mod config;
pub mod error;
pub mod ledger;
pub mod types;

pub use config::{BackendConfig, DaemonConfig, InventoryConfig, ServerConfig};
pub use error::{ConfigError, FormatError};
pub use ledger::Capacity;
pub use types::*;
