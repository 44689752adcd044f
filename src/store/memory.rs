//! In-memory health check store with snapshot persistence.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::healthcheck::HealthCheckSpec;
use crate::store::{HealthCheckStore, Operation, StoreError, StoreResult};

/// A thread-safe keyed store of health checks.
///
/// Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<DashMap<String, HealthCheckSpec>>,
    /// One-shot failures returned by the next call of an operation.
    faults: Arc<DashMap<Operation, StoreError>>,
    persistence_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON snapshot if it exists; the path is remembered for [`save_to_file`].
    ///
    /// [`save_to_file`]: InMemoryStore::save_to_file
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let store = Self {
            persistence_path: Some(path.to_path_buf()),
            ..Self::default()
        };
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: BTreeMap<String, HealthCheckSpec> = serde_json::from_reader(reader)?;
            for (name, spec) in map {
                store.inner.insert(name, spec);
            }
            tracing::info!(path = ?path, count = store.inner.len(), "Loaded health checks from snapshot");
        }
        Ok(store)
    }

    /// Write all entries to the snapshot path, if one was configured.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let writer = BufWriter::new(File::create(path)?);
            let map: BTreeMap<_, _> = self
                .inner
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect();
            serde_json::to_writer_pretty(writer, &map)?;
            tracing::info!(path = ?path, count = map.len(), "Saved health checks to snapshot");
        }
        Ok(())
    }

    /// Make the next call of `op` fail with `error`.
    pub fn inject_fault(&self, op: Operation, error: StoreError) {
        self.faults.insert(op, error);
    }

    fn take_fault(&self, op: Operation) -> StoreResult<()> {
        match self.faults.remove(&op) {
            Some((_, error)) => {
                tracing::debug!(op = %op, error = %error, "Returning injected store fault");
                Err(error)
            }
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// All stored health checks, sorted by name.
    pub fn snapshot(&self) -> Vec<HealthCheckSpec> {
        let mut specs: Vec<_> = self.inner.iter().map(|r| r.value().clone()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }
}

impl HealthCheckStore for InMemoryStore {
    fn create(&self, spec: &HealthCheckSpec) -> StoreResult<()> {
        self.take_fault(Operation::Create)?;
        match self.inner.entry(spec.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(spec.name.clone())),
            Entry::Vacant(slot) => {
                slot.insert(spec.clone());
                Ok(())
            }
        }
    }

    fn get(&self, name: &str) -> StoreResult<HealthCheckSpec> {
        self.take_fault(Operation::Get)?;
        self.inner
            .get(name)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn update(&self, spec: &HealthCheckSpec) -> StoreResult<()> {
        self.take_fault(Operation::Update)?;
        match self.inner.get_mut(&spec.name) {
            Some(mut existing) => {
                *existing = spec.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(spec.name.clone())),
        }
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.take_fault(Operation::Delete)?;
        self.inner
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
