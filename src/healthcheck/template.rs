//! Desired health check resolution.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{HealthCheckTemplate, ReconcilerConfig};
use crate::healthcheck::naming::Namer;
use crate::healthcheck::spec::HealthCheckSpec;

#[derive(Debug, Clone, Default)]
struct TemplateTable {
    default: HealthCheckTemplate,
    overrides: HashMap<u16, HealthCheckTemplate>,
}

/// Computes the desired health check for a backend port.
///
/// The template table is swapped atomically, so `resolve` never observes a
/// half-applied reload.
#[derive(Debug)]
pub struct TemplateResolver {
    namer: Namer,
    table: ArcSwap<TemplateTable>,
}

impl TemplateResolver {
    pub fn new(namer: Namer, default: HealthCheckTemplate) -> Self {
        Self {
            namer,
            table: ArcSwap::from_pointee(TemplateTable {
                default,
                overrides: HashMap::new(),
            }),
        }
    }

    pub fn from_config(config: &ReconcilerConfig) -> Self {
        let resolver = Self::new(Namer::from_config(&config.naming), config.default_template.clone());
        resolver.apply_config(config);
        resolver
    }

    pub fn namer(&self) -> &Namer {
        &self.namer
    }

    /// Desired spec for `port`: the port's override if registered, else the default.
    ///
    /// Name and port are always stamped from `port`.
    pub fn resolve(&self, port: u16) -> HealthCheckSpec {
        let table = self.table.load();
        let template = table.overrides.get(&port).unwrap_or(&table.default);
        template.for_port(self.namer.name(port), port)
    }

    pub fn has_override(&self, port: u16) -> bool {
        self.table.load().overrides.contains_key(&port)
    }

    pub fn set_override(&self, port: u16, template: HealthCheckTemplate) {
        self.table.rcu(|current| {
            let mut next = TemplateTable::clone(current);
            next.overrides.insert(port, template.clone());
            next
        });
    }

    pub fn clear_override(&self, port: u16) {
        self.table.rcu(|current| {
            let mut next = TemplateTable::clone(current);
            next.overrides.remove(&port);
            next
        });
    }

    /// Replace the default template and every override at once.
    pub fn replace(&self, default: HealthCheckTemplate, overrides: HashMap<u16, HealthCheckTemplate>) {
        self.table.store(Arc::new(TemplateTable { default, overrides }));
    }

    /// Replace templates from a (re)loaded configuration. Naming is not changed.
    pub fn apply_config(&self, config: &ReconcilerConfig) {
        let overrides = config
            .overrides
            .iter()
            .map(|o| (o.port, o.template.clone()))
            .collect();
        self.replace(config.default_template.clone(), overrides);
    }
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new(Namer::default(), HealthCheckTemplate::default())
    }
}
