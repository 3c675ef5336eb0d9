//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the backend router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Frontend lookup cache settings.
    pub cache: CacheConfig,

    /// Routing store client settings.
    pub store: StoreConfig,

    /// Access log settings.
    pub access_log: AccessLogConfig,

    /// Diagnostic logging settings.
    pub observability: ObservabilityConfig,
}

/// Lookup cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached frontends.
    pub capacity: usize,

    /// Time a cached entry stays valid in milliseconds (0 = until evicted or purged).
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl_ms: 2_000,
        }
    }
}

/// Routing store client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Deadline for each store call in milliseconds (0 = none).
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { timeout_ms: 1_000 }
    }
}

/// Access log configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AccessLogConfig {
    /// "none", "stdout", "stderr" or a file path to append to.
    pub destination: String,

    /// Lines queued for the writer before new lines are dropped.
    pub buffer_size: usize,
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            destination: "none".to_string(),
            buffer_size: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
