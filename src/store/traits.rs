//! Trait definitions for store operations
//!
//! These traits abstract over the host's state store to enable testing with
//! in-memory implementations.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single state as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSample {
    /// Raw value
    pub val: Value,
    /// Timestamp of the sample in epoch milliseconds
    pub ts: i64,
    /// Whether the value was acknowledged by its owner
    #[serde(default)]
    pub ack: bool,
}

impl StateSample {
    /// Create an acknowledged sample
    pub fn new(val: impl Into<Value>, ts: i64) -> Self {
        Self {
            val: val.into(),
            ts,
            ack: true,
        }
    }
}

/// Object metadata attached to a key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Human display name
    #[serde(default)]
    pub name: Option<String>,
}

impl ObjectMeta {
    /// Metadata carrying only a display name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Trait for key-value state access
pub trait StateStore {
    /// Get a single state
    fn state(&self, id: &str) -> Result<Option<StateSample>, StoreError>;

    /// Get all states whose key matches a glob pattern, ordered by key
    fn states_matching(&self, pattern: &str) -> Result<Vec<(String, StateSample)>, StoreError>;

    /// Write a state
    fn set_state(&mut self, id: &str, val: Value, ack: bool) -> Result<(), StoreError>;

    /// Get the value of a state, treating `null` the same as a missing state
    fn value(&self, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .state(id)?
            .map(|sample| sample.val)
            .filter(|val| !val.is_null()))
    }
}

/// Trait for object metadata lookups
pub trait ObjectStore {
    /// Get metadata for a key
    fn object(&self, id: &str) -> Result<Option<ObjectMeta>, StoreError>;
}

/// Trait for messages addressed to other adapter instances
pub trait MessageBus {
    /// Send a command with payload to an instance
    fn send_to(&mut self, instance: &str, command: &str, payload: &Value)
        -> Result<(), StoreError>;
}

/// Everything the engine needs from its host
pub trait Host: StateStore + ObjectStore + MessageBus {}

impl<T: StateStore + ObjectStore + MessageBus + ?Sized> Host for T {}
