//! Deterministic health check naming.

use crate::config::NamingConfig;

/// Maps backend ports to health check names and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    prefix: String,
    suffix: String,
}

impl Namer {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &NamingConfig) -> Self {
        Self::new(config.prefix.clone(), config.suffix.clone())
    }

    /// Name of the health check for `port`, e.g. `k8s-be-80-node-port`.
    pub fn name(&self, port: u16) -> String {
        if self.suffix.is_empty() {
            format!("{}-{}", self.prefix, port)
        } else {
            format!("{}-{}-{}", self.prefix, port, self.suffix)
        }
    }

    /// Inverse of [`Namer::name`]. Returns `None` for names this namer did not produce.
    pub fn port_of(&self, name: &str) -> Option<u16> {
        let rest = name.strip_prefix(self.prefix.as_str())?.strip_prefix('-')?;
        let digits = if self.suffix.is_empty() {
            rest
        } else {
            rest.strip_suffix(self.suffix.as_str())?.strip_suffix('-')?
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let port: u16 = digits.parse().ok()?;
        // Reject non-canonical spellings such as leading zeros.
        (self.name(port) == name).then_some(port)
    }
}

impl Default for Namer {
    fn default() -> Self {
        Self::from_config(&NamingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_naming() {
        let namer = Namer::default();
        assert_eq!(namer.name(80), "k8s-be-80-node-port");
        assert_eq!(namer.port_of("k8s-be-80-node-port"), Some(80));
    }

    #[test]
    fn test_foreign_names_rejected() {
        let namer = Namer::default();
        assert_eq!(namer.port_of("k8s-be-80"), None);
        assert_eq!(namer.port_of("other-80-node-port"), None);
        assert_eq!(namer.port_of("k8s-be-080-node-port"), None);
        assert_eq!(namer.port_of("k8s-be-99999-node-port"), None);
        assert_eq!(namer.port_of("k8s-be--node-port"), None);
    }

    #[test]
    fn test_empty_suffix() {
        let namer = Namer::new("lb", "");
        assert_eq!(namer.name(443), "lb-443");
        assert_eq!(namer.port_of("lb-443"), Some(443));
        assert_eq!(namer.port_of("lb-443-x"), None);
    }
}
