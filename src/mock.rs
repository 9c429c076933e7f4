//! Mock implementations for testing
//!
//! Provides a store wrapper that injects failures into single reads, pattern
//! queries, metadata lookups, writes and message deliveries.

use crate::error::StoreError;
use crate::store::{
    MemoryStore, MessageBus, ObjectMeta, ObjectStore, SentMessage, StateSample, StateStore,
};

use serde_json::Value;
use std::collections::HashSet;

/// Memory store with injectable failures
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    failing_reads: HashSet<String>,
    failing_patterns: HashSet<String>,
    failing_objects: HashSet<String>,
    failing_writes: HashSet<String>,
    failing_instances: HashSet<String>,
}

impl FaultyStore {
    /// Wrap a populated memory store
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Builder: reading this state fails
    pub fn failing_read(mut self, id: &str) -> Self {
        self.failing_reads.insert(id.to_string());
        self
    }

    /// Builder: querying this pattern fails
    pub fn failing_pattern(mut self, pattern: &str) -> Self {
        self.failing_patterns.insert(pattern.to_string());
        self
    }

    /// Builder: metadata lookup of this key fails
    pub fn failing_object(mut self, id: &str) -> Self {
        self.failing_objects.insert(id.to_string());
        self
    }

    /// Builder: writing this state fails
    pub fn failing_write(mut self, id: &str) -> Self {
        self.failing_writes.insert(id.to_string());
        self
    }

    /// Builder: messages to this instance fail
    pub fn failing_instance(mut self, instance: &str) -> Self {
        self.failing_instances.insert(instance.to_string());
        self
    }

    /// The wrapped store
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Messages delivered so far
    pub fn outbox(&self) -> &[SentMessage] {
        self.inner.outbox()
    }
}

impl StateStore for FaultyStore {
    fn state(&self, id: &str) -> Result<Option<StateSample>, StoreError> {
        if self.failing_reads.contains(id) {
            return Err(StoreError::Read(id.to_string()));
        }
        self.inner.state(id)
    }

    fn states_matching(&self, pattern: &str) -> Result<Vec<(String, StateSample)>, StoreError> {
        if self.failing_patterns.contains(pattern) {
            return Err(StoreError::Read(pattern.to_string()));
        }
        self.inner.states_matching(pattern)
    }

    fn set_state(&mut self, id: &str, val: Value, ack: bool) -> Result<(), StoreError> {
        if self.failing_writes.contains(id) {
            return Err(StoreError::Write(id.to_string()));
        }
        self.inner.set_state(id, val, ack)
    }
}

impl ObjectStore for FaultyStore {
    fn object(&self, id: &str) -> Result<Option<ObjectMeta>, StoreError> {
        if self.failing_objects.contains(id) {
            return Err(StoreError::Read(id.to_string()));
        }
        self.inner.object(id)
    }
}

impl MessageBus for FaultyStore {
    fn send_to(&mut self, instance: &str, command: &str, payload: &Value) -> Result<(), StoreError> {
        if self.failing_instances.contains(instance) {
            return Err(StoreError::Delivery {
                instance: instance.to_string(),
                command: command.to_string(),
                message: "instance not running".to_string(),
            });
        }
        self.inner.send_to(instance, command, payload)
    }
}
