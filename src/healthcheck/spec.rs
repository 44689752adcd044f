//! Health check resource definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probe protocol used by the load balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Http,
    Https,
    Tcp,
}

impl Protocol {
    /// Whether probes of this protocol carry a request path.
    pub fn uses_path(&self) -> bool {
        matches!(self, Protocol::Http | Protocol::Https)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "HTTP"),
            Protocol::Https => write!(f, "HTTPS"),
            Protocol::Tcp => write!(f, "TCP"),
        }
    }
}

/// A named health check as persisted by the cloud provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthCheckSpec {
    /// Unique key, derived from the port.
    pub name: String,

    /// Backend port being probed.
    pub port: u16,

    pub protocol: Protocol,

    /// Request path for HTTP(S) probes.
    pub path: String,

    /// Seconds between probes.
    pub check_interval_sec: u32,

    /// Seconds before a probe is considered failed.
    pub timeout_sec: u32,

    /// Consecutive successes before a backend is marked healthy.
    pub healthy_threshold: u32,

    /// Consecutive failures before a backend is marked unhealthy.
    pub unhealthy_threshold: u32,

    /// Free-form description. Not part of probing behaviour.
    #[serde(default)]
    pub description: String,
}

impl HealthCheckSpec {
    /// Names of the behaviour-affecting fields that differ between `self` and `other`.
    pub fn drift(&self, other: &HealthCheckSpec) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.port != other.port {
            fields.push("port");
        }
        if self.protocol != other.protocol {
            fields.push("protocol");
        }
        if self.path != other.path {
            fields.push("path");
        }
        if self.check_interval_sec != other.check_interval_sec {
            fields.push("check_interval_sec");
        }
        if self.timeout_sec != other.timeout_sec {
            fields.push("timeout_sec");
        }
        if self.healthy_threshold != other.healthy_threshold {
            fields.push("healthy_threshold");
        }
        if self.unhealthy_threshold != other.unhealthy_threshold {
            fields.push("unhealthy_threshold");
        }
        fields
    }

    /// True when both specs probe the same way. `name` and `description` are ignored.
    pub fn behaviour_eq(&self, other: &HealthCheckSpec) -> bool {
        self.drift(other).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> HealthCheckSpec {
        HealthCheckSpec {
            name: "k8s-be-80-node-port".into(),
            port: 80,
            protocol: Protocol::Http,
            path: "/".into(),
            check_interval_sec: 10,
            timeout_sec: 5,
            healthy_threshold: 2,
            unhealthy_threshold: 3,
            description: String::new(),
        }
    }

    #[test]
    fn test_description_is_not_drift() {
        let a = spec();
        let mut b = spec();
        b.description = "changed by hand".into();
        assert!(a.behaviour_eq(&b));
    }

    #[test]
    fn test_drift_lists_fields() {
        let a = spec();
        let mut b = spec();
        b.timeout_sec = 1;
        b.path = "/healthz".into();
        assert_eq!(a.drift(&b), vec!["path", "timeout_sec"]);
        assert!(!a.behaviour_eq(&b));
    }

    #[test]
    fn test_protocol_serde() {
        let json = serde_json::to_string(&Protocol::Https).unwrap();
        assert_eq!(json, "\"HTTPS\"");
        let p: Protocol = serde_json::from_str("\"TCP\"").unwrap();
        assert_eq!(p, Protocol::Tcp);
        assert!(!p.uses_path());
    }
}
