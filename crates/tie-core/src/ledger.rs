//! Capacity ledger — reserved capacity stored in a workload's environment.
//!
//! Container runtimes have no notion of "reserved cpu/memory" that survives
//! a round trip through their API, but they do keep a container's
//! environment. The ledger writes the requested capacity into two reserved
//! variables at launch and reads it back when the workload is listed.
//!
//! All ledger keys share the `DOCKERTIE_` namespace. Request tags are folded
//! into the same namespace; the two reserved entries always win over a tag
//! or user variable that normalizes to the same key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::types::WorkloadRequest;

/// Prefix for every variable the ledger owns.
pub const NAMESPACE: &str = "DOCKERTIE_";

/// Reserved cpu entry.
pub const CPU_CAPACITY_KEY: &str = "DOCKERTIE_CPU_CAPACITY";

/// Reserved memory entry.
pub const MEMORY_CAPACITY_KEY: &str = "DOCKERTIE_MEMORY_CAPACITY";

/// Capacity reserved by a single workload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub cpu: u32,
    pub memory: u32,
}

impl Capacity {
    pub fn new(cpu: u32, memory: u32) -> Self {
        Self { cpu, memory }
    }

    /// Capacity requested by a workload request.
    pub fn of_request(req: &WorkloadRequest) -> Self {
        Self::new(req.cpu_capacity, req.memory_capacity)
    }
}

/// Namespaced environment key for a request tag.
///
/// `"build id"` becomes `DOCKERTIE_BUILD_ID`.
pub fn tag_key(tag: &str) -> String {
    format!("{NAMESPACE}{}", tag.to_uppercase().replace(' ', "_"))
}

/// Build the environment a workload is launched with.
///
/// The result is `req.env`, plus each tag under its namespaced key, plus the
/// reserved capacity entries.
pub fn encode(req: &WorkloadRequest) -> HashMap<String, String> {
    let mut env = req.env.clone();

    for (key, value) in &req.tags {
        env.insert(tag_key(key), value.clone());
    }

    env.insert(CPU_CAPACITY_KEY.to_string(), req.cpu_capacity.to_string());
    env.insert(
        MEMORY_CAPACITY_KEY.to_string(),
        req.memory_capacity.to_string(),
    );

    env
}

/// Recover reserved capacity from a workload's environment.
///
/// A missing entry counts as zero. An entry that is present but not a
/// non-negative integer is an error.
pub fn decode(env: &HashMap<String, String>) -> Result<Capacity, FormatError> {
    Ok(Capacity {
        cpu: read_entry(env, CPU_CAPACITY_KEY)?,
        memory: read_entry(env, MEMORY_CAPACITY_KEY)?,
    })
}

/// Tags folded into a workload's environment, keyed by their normalized name.
///
/// The reserved capacity entries are not tags and are skipped.
pub fn tags_from_env(env: &HashMap<String, String>) -> HashMap<String, String> {
    env.iter()
        .filter(|(k, _)| k.as_str() != CPU_CAPACITY_KEY && k.as_str() != MEMORY_CAPACITY_KEY)
        .filter_map(|(k, v)| {
            k.strip_prefix(NAMESPACE)
                .filter(|tag| !tag.is_empty())
                .map(|tag| (tag.to_string(), v.clone()))
        })
        .collect()
}

fn read_entry(env: &HashMap<String, String>, key: &str) -> Result<u32, FormatError> {
    match env.get(key) {
        None => Ok(0),
        Some(value) => value.parse::<u32>().map_err(|_| FormatError {
            key: key.to_string(),
            value: value.clone(),
        }),
    }
}
