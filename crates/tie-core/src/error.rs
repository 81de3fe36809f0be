//! Error types shared across dockertie crates.

use thiserror::Error;

/// A ledger entry exists but does not hold a non-negative integer.
///
/// Never defaulted to zero: a wrong zero would let the scheduler
/// overcommit a host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed capacity in {key}: {value:?}")]
pub struct FormatError {
    pub key: String,
    pub value: String,
}

/// Errors raised while loading or validating the daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
