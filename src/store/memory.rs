//! In-memory store
//!
//! Holds states, object metadata and an outbox of sent messages. Serves as
//! the backing model of the snapshot file and as the store used by tests.

use super::pattern::Selector;
use super::traits::{MessageBus, ObjectMeta, ObjectStore, StateSample, StateStore};
use crate::error::StoreError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Message handed to another instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    pub instance: String,
    pub command: String,
    pub payload: Value,
}

/// In-memory state, object and message store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    states: BTreeMap<String, StateSample>,
    objects: BTreeMap<String, ObjectMeta>,
    outbox: Vec<SentMessage>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a state
    pub fn with_state(mut self, id: &str, val: impl Into<Value>, ts: i64) -> Self {
        self.insert_state(id, val, ts);
        self
    }

    /// Builder: add object metadata with a display name
    pub fn with_object(mut self, id: &str, name: &str) -> Self {
        self.objects.insert(id.to_string(), ObjectMeta::named(name));
        self
    }

    /// Insert or replace a state
    pub fn insert_state(&mut self, id: &str, val: impl Into<Value>, ts: i64) {
        self.states
            .insert(id.to_string(), StateSample::new(val, ts));
    }

    /// Messages sent so far, oldest first
    pub fn outbox(&self) -> &[SentMessage] {
        &self.outbox
    }

    /// Number of stored states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl StateStore for MemoryStore {
    fn state(&self, id: &str) -> Result<Option<StateSample>, StoreError> {
        Ok(self.states.get(id).cloned())
    }

    fn states_matching(&self, pattern: &str) -> Result<Vec<(String, StateSample)>, StoreError> {
        let selector = Selector::parse(pattern)?;
        Ok(self
            .states
            .iter()
            .filter(|(id, _)| selector.matches(id))
            .map(|(id, sample)| (id.clone(), sample.clone()))
            .collect())
    }

    fn set_state(&mut self, id: &str, val: Value, ack: bool) -> Result<(), StoreError> {
        let ts = chrono::Utc::now().timestamp_millis();
        self.states
            .insert(id.to_string(), StateSample { val, ts, ack });
        Ok(())
    }
}

impl ObjectStore for MemoryStore {
    fn object(&self, id: &str) -> Result<Option<ObjectMeta>, StoreError> {
        Ok(self.objects.get(id).cloned())
    }
}

impl MessageBus for MemoryStore {
    fn send_to(
        &mut self,
        instance: &str,
        command: &str,
        payload: &Value,
    ) -> Result<(), StoreError> {
        self.outbox.push(SentMessage {
            instance: instance.to_string(),
            command: command.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_states_matching_is_ordered_by_key() {
        let store = MemoryStore::new()
            .with_state("zigbee.0.b.link_quality", 10, 0)
            .with_state("zigbee.0.a.link_quality", 20, 0)
            .with_state("zigbee.0.a.battery", 90, 0);

        let matched = store.states_matching("zigbee.*.link_quality").unwrap();
        let ids: Vec<_> = matched.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["zigbee.0.a.link_quality", "zigbee.0.b.link_quality"]);
    }

    #[test]
    fn test_value_treats_null_as_absent() {
        let store = MemoryStore::new().with_state("a.b", Value::Null, 0);
        assert!(store.state("a.b").unwrap().is_some());
        assert_eq!(store.value("a.b").unwrap(), None);
        assert_eq!(store.value("missing").unwrap(), None);
    }

    #[test]
    fn test_set_state_overwrites() {
        let mut store = MemoryStore::new().with_state("ns.offlineCount", 1, 0);
        store.set_state("ns.offlineCount", json!(3), true).unwrap();
        assert_eq!(store.value("ns.offlineCount").unwrap(), Some(json!(3)));
    }

    #[test]
    fn test_send_to_records_outbox() {
        let mut store = MemoryStore::new();
        store
            .send_to("pushover.0", "send", &json!({"message": "hi"}))
            .unwrap();
        assert_eq!(store.outbox().len(), 1);
        assert_eq!(store.outbox()[0].instance, "pushover.0");
    }

    #[test]
    fn test_serde_shape() {
        let store = MemoryStore::new()
            .with_state("a.b", 1, 5)
            .with_object("a", "Device A");
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["states"]["a.b"]["ts"], json!(5));
        assert_eq!(json["objects"]["a"]["name"], json!("Device A"));

        let back: MemoryStore = serde_json::from_value(json).unwrap();
        assert_eq!(back.state_count(), 1);
    }
}
