//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports non-zero, thresholds and intervals positive)
//! - Detect duplicate ports and overrides
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ReconcilerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{HealthCheckTemplate, ReconcilerConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ReconcilerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.naming.prefix.is_empty() {
        errors.push(ValidationError::new("naming.prefix", "must not be empty"));
    }

    validate_template("default_template", &config.default_template, &mut errors);

    let mut seen = HashSet::new();
    for (i, entry) in config.overrides.iter().enumerate() {
        let field = format!("overrides[{}]", i);
        if entry.port == 0 {
            errors.push(ValidationError::new(format!("{}.port", field), "must be in 1..=65535"));
        }
        if !seen.insert(entry.port) {
            errors.push(ValidationError::new(
                format!("{}.port", field),
                format!("duplicate override for port {}", entry.port),
            ));
        }
        validate_template(&field, &entry.template, &mut errors);
    }

    let controller = &config.controller;
    let mut ports = HashSet::new();
    for port in &controller.ports {
        if *port == 0 {
            errors.push(ValidationError::new("controller.ports", "port 0 is not a valid backend port"));
        }
        if !ports.insert(*port) {
            errors.push(ValidationError::new("controller.ports", format!("port {} listed twice", port)));
        }
    }
    if controller.resync_interval_secs == 0 {
        errors.push(ValidationError::new("controller.resync_interval_secs", "must be at least 1"));
    }
    if controller.max_attempts == 0 {
        errors.push(ValidationError::new("controller.max_attempts", "must be at least 1"));
    }
    if controller.base_delay_ms > controller.max_delay_ms {
        errors.push(ValidationError::new(
            "controller.base_delay_ms",
            "must not exceed controller.max_delay_ms",
        ));
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format {:?}, expected \"pretty\" or \"json\"", observability.log_format),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_template(field: &str, template: &HealthCheckTemplate, errors: &mut Vec<ValidationError>) {
    if template.protocol.uses_path() && !template.path.starts_with('/') {
        errors.push(ValidationError::new(
            format!("{}.path", field),
            format!("{:?} must start with '/'", template.path),
        ));
    }
    if template.check_interval_sec == 0 {
        errors.push(ValidationError::new(format!("{}.check_interval_sec", field), "must be at least 1"));
    }
    if template.timeout_sec == 0 {
        errors.push(ValidationError::new(format!("{}.timeout_sec", field), "must be at least 1"));
    }
    if template.timeout_sec > template.check_interval_sec {
        errors.push(ValidationError::new(
            format!("{}.timeout_sec", field),
            "must not exceed check_interval_sec",
        ));
    }
    if template.healthy_threshold == 0 {
        errors.push(ValidationError::new(format!("{}.healthy_threshold", field), "must be at least 1"));
    }
    if template.unhealthy_threshold == 0 {
        errors.push(ValidationError::new(format!("{}.unhealthy_threshold", field), "must be at least 1"));
    }
}
