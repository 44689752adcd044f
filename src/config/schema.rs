//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the reconciler.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::healthcheck::{HealthCheckSpec, Protocol};

/// Root configuration for the health check reconciler.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Health check naming scheme.
    pub naming: NamingConfig,

    /// Template applied to ports without an override.
    pub default_template: HealthCheckTemplate,

    /// Per-port template overrides.
    pub overrides: Vec<OverrideConfig>,

    /// Controller loop settings.
    pub controller: ControllerConfig,

    /// In-memory store persistence.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Naming scheme: `{prefix}-{port}-{suffix}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NamingConfig {
    pub prefix: String,

    /// May be empty, in which case names are `{prefix}-{port}`.
    pub suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: "k8s-be".to_string(),
            suffix: "node-port".to_string(),
        }
    }
}

/// Desired health check settings, independent of any port.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HealthCheckTemplate {
    /// Probe protocol.
    pub protocol: Protocol,

    /// Path to probe for HTTP(S) health checks.
    pub path: String,

    /// Health check interval in seconds.
    pub check_interval_sec: u32,

    /// Health check timeout in seconds.
    pub timeout_sec: u32,

    /// Number of consecutive successes before marking healthy.
    pub healthy_threshold: u32,

    /// Number of consecutive failures before marking unhealthy.
    pub unhealthy_threshold: u32,

    /// Description attached to created resources.
    pub description: String,
}

impl Default for HealthCheckTemplate {
    fn default() -> Self {
        Self {
            protocol: Protocol::Http,
            path: "/".to_string(),
            check_interval_sec: 10,
            timeout_sec: 5,
            healthy_threshold: 2,
            unhealthy_threshold: 3,
            description: "Default kubernetes L7 Loadbalancing health check.".to_string(),
        }
    }
}

impl HealthCheckTemplate {
    /// Stamp the template with a name and port.
    pub fn for_port(&self, name: String, port: u16) -> HealthCheckSpec {
        HealthCheckSpec {
            name,
            port,
            protocol: self.protocol,
            path: self.path.clone(),
            check_interval_sec: self.check_interval_sec,
            timeout_sec: self.timeout_sec,
            healthy_threshold: self.healthy_threshold,
            unhealthy_threshold: self.unhealthy_threshold,
            description: self.description.clone(),
        }
    }
}

/// Template override for a single backend port.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OverrideConfig {
    pub port: u16,

    #[serde(flatten)]
    pub template: HealthCheckTemplate,
}

/// Controller loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Backend ports that need a health check.
    pub ports: Vec<u16>,

    /// Seconds between full reconciliation passes.
    pub resync_interval_secs: u64,

    /// Attempts per pass before giving up until the next resync.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ports: Vec::new(),
            resync_interval_secs: 30,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot loaded at startup and written on shutdown.
    pub snapshot_path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
