//! Call-counting store decorator.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::healthcheck::HealthCheckSpec;
use crate::store::{HealthCheckStore, Operation, StoreResult};

/// Wraps a store and counts calls per operation, successful or not.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    creates: AtomicUsize,
    gets: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            creates: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn counter(&self, op: Operation) -> &AtomicUsize {
        match op {
            Operation::Create => &self.creates,
            Operation::Get => &self.gets,
            Operation::Update => &self.updates,
            Operation::Delete => &self.deletes,
        }
    }

    /// Number of calls made for `op`.
    pub fn calls(&self, op: Operation) -> usize {
        self.counter(op).load(Ordering::Relaxed)
    }

    /// Total create, update and delete calls.
    pub fn mutating_calls(&self) -> usize {
        [Operation::Create, Operation::Update, Operation::Delete]
            .iter()
            .map(|op| self.calls(*op))
            .sum()
    }

    /// Zero all counters.
    pub fn reset(&self) {
        for op in [Operation::Create, Operation::Get, Operation::Update, Operation::Delete] {
            self.counter(op).store(0, Ordering::Relaxed);
        }
    }

    fn record(&self, op: Operation) {
        self.counter(op).fetch_add(1, Ordering::Relaxed);
    }
}

impl<S: HealthCheckStore> HealthCheckStore for CountingStore<S> {
    fn create(&self, spec: &HealthCheckSpec) -> StoreResult<()> {
        self.record(Operation::Create);
        self.inner.create(spec)
    }

    fn get(&self, name: &str) -> StoreResult<HealthCheckSpec> {
        self.record(Operation::Get);
        self.inner.get(name)
    }

    fn update(&self, spec: &HealthCheckSpec) -> StoreResult<()> {
        self.record(Operation::Update);
        self.inner.update(spec)
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.record(Operation::Delete);
        self.inner.delete(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthCheckTemplate;
    use crate::store::InMemoryStore;

    #[test]
    fn test_counts_failed_calls_too() {
        let store = CountingStore::new(InMemoryStore::new());
        let hc = HealthCheckTemplate::default().for_port("hc".into(), 80);

        assert!(store.get("hc").is_err());
        store.create(&hc).unwrap();
        assert!(store.create(&hc).is_err());
        store.update(&hc).unwrap();
        store.delete("hc").unwrap();

        assert_eq!(store.calls(Operation::Get), 1);
        assert_eq!(store.calls(Operation::Create), 2);
        assert_eq!(store.mutating_calls(), 4);

        store.reset();
        assert_eq!(store.mutating_calls(), 0);
        assert!(store.inner().is_empty());
    }
}
