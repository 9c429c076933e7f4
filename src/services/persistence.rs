//! Engine-owned output keys
//!
//! Loads the notification state at the start of a run and builds the writes
//! that publish a run's results. All keys live below the configured
//! namespace.

use crate::alerts::{Alert, NotificationState, STAMP_FORMAT};
use crate::domain::{list_or_placeholder, AggregatedLists};
use crate::error::StoreError;
use crate::store::value::{as_numeric, is_truthy_opt};
use crate::store::StateStore;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;

pub const OFFLINE_COUNT: &str = "offlineCount";
pub const COUNT_ALL: &str = "countAll";
pub const BATTERY_COUNT: &str = "batteryCount";
pub const LOW_BATTERY_COUNT: &str = "lowBatteryCount";
pub const LIST_ALL: &str = "listAll";
pub const LINK_QUALITY_LIST: &str = "linkQualityList";
pub const OFFLINE_LIST: &str = "offlineList";
pub const BATTERY_LIST: &str = "batteryList";
pub const LOW_BATTERY_LIST: &str = "lowBatteryList";
pub const LAST_CHECK: &str = "lastCheck";
pub const LAST_NOTIFICATION: &str = "lastNotification";
pub const BATTERY_LATCH: &str = "info.lastBatteryNotification";

/// A pending state write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateWrite {
    pub id: String,
    pub val: Value,
}

/// Reads and writes the engine-owned keys
#[derive(Debug, Clone)]
pub struct OutputWriter {
    namespace: String,
}

impl OutputWriter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Full key of an engine-owned state
    pub fn key(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Load the state persisted by the previous run
    ///
    /// A missing or non-numeric count reads as zero, a missing latch as
    /// cleared.
    pub fn load_state<S>(&self, store: &S) -> Result<NotificationState, StoreError>
    where
        S: StateStore + ?Sized,
    {
        let offline_count = store
            .value(&self.key(OFFLINE_COUNT))?
            .as_ref()
            .and_then(as_numeric)
            .filter(|n| *n > 0.0)
            .map_or(0, |n| n.round() as usize);
        let latch = store.value(&self.key(BATTERY_LATCH))?;

        Ok(NotificationState {
            offline_count,
            battery_notified_today: is_truthy_opt(latch.as_ref()),
        })
    }

    /// Record an alert as the last notification
    pub fn notification(&self, alert: &Alert) -> StateWrite {
        self.write(LAST_NOTIFICATION, Value::String(alert.record.clone()))
    }

    /// Counts, lists and the check timestamp of a run
    ///
    /// Empty lists are written as a single placeholder record.
    pub fn results(
        &self,
        lists: &AggregatedLists,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<StateWrite>, StoreError> {
        Ok(vec![
            self.write(OFFLINE_COUNT, Value::from(lists.offline_count())),
            self.write(COUNT_ALL, Value::from(lists.count_all())),
            self.write(BATTERY_COUNT, Value::from(lists.battery_count())),
            self.write(LOW_BATTERY_COUNT, Value::from(lists.low_battery_count())),
            self.write(LIST_ALL, Value::String(list_or_placeholder(&lists.all)?)),
            self.write(
                LINK_QUALITY_LIST,
                Value::String(list_or_placeholder(&lists.link_quality)?),
            ),
            self.write(OFFLINE_LIST, Value::String(list_or_placeholder(&lists.offline)?)),
            self.write(BATTERY_LIST, Value::String(list_or_placeholder(&lists.battery)?)),
            self.write(
                LOW_BATTERY_LIST,
                Value::String(list_or_placeholder(&lists.low_battery)?),
            ),
            self.write(LAST_CHECK, Value::String(now.format(STAMP_FORMAT).to_string())),
        ])
    }

    /// The low battery latch
    pub fn latch(&self, notified_today: bool) -> StateWrite {
        self.write(BATTERY_LATCH, Value::Bool(notified_today))
    }

    fn write(&self, name: &str, val: Value) -> StateWrite {
        StateWrite {
            id: self.key(name),
            val,
        }
    }
}

/// Apply writes in order as acknowledged states
///
/// A failing first write is returned and leaves the store untouched. Once
/// the first write succeeded every later write is attempted and failures
/// are logged. Returns the ids that could not be written.
pub fn apply<S>(store: &mut S, writes: &[StateWrite]) -> Result<Vec<String>, StoreError>
where
    S: StateStore + ?Sized,
{
    let mut writes = writes.iter();
    if let Some(first) = writes.next() {
        store.set_state(&first.id, first.val.clone(), true)?;
    }

    let mut failed = Vec::new();
    for write in writes {
        if let Err(e) = store.set_state(&write.id, write.val.clone(), true) {
            log::error!("Failed to write {}: {}", write.id, e);
            failed.push(write.id.clone());
        }
    }
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OfflineRecord;
    use crate::mock::FaultyStore;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn writer() -> OutputWriter {
        OutputWriter::new("device-watcher.0")
    }

    #[test]
    fn test_load_state_defaults() {
        let state = writer().load_state(&MemoryStore::new()).unwrap();
        assert_eq!(state, NotificationState::default());
    }

    #[test]
    fn test_load_state() {
        let store = MemoryStore::new()
            .with_state("device-watcher.0.offlineCount", 3, 0)
            .with_state("device-watcher.0.info.lastBatteryNotification", true, 0);
        let state = writer().load_state(&store).unwrap();
        assert_eq!(state.offline_count, 3);
        assert!(state.battery_notified_today);

        let store = MemoryStore::new().with_state("device-watcher.0.offlineCount", "2", 0);
        assert_eq!(writer().load_state(&store).unwrap().offline_count, 2);
    }

    #[test]
    fn test_results_with_placeholders() {
        let mut lists = AggregatedLists::default();
        lists.offline.push(OfflineRecord {
            device: "Lamp".to_string(),
            adapter: "Hue".to_string(),
            last_contact: "4 Stunden".to_string(),
        });
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap();

        let writes = writer().results(&lists, now).unwrap();
        let mut store = MemoryStore::new();
        apply(&mut store, &writes).unwrap();

        assert_eq!(store.value("device-watcher.0.offlineCount").unwrap(), Some(json!(1)));
        assert_eq!(store.value("device-watcher.0.countAll").unwrap(), Some(json!(0)));
        assert_eq!(
            store.value("device-watcher.0.listAll").unwrap(),
            Some(json!(
                r#"[{"Device":"--keine--","Adapter":"","Battery":"","Last_contact":"","Link_quality":""}]"#
            ))
        );
        assert_eq!(
            store.value("device-watcher.0.offlineList").unwrap(),
            Some(json!(r#"[{"Device":"Lamp","Adapter":"Hue","Last_contact":"4 Stunden"}]"#))
        );
        assert_eq!(
            store.value("device-watcher.0.lastCheck").unwrap(),
            Some(json!("02.01.2024 - 03:04:05"))
        );
        assert!(store.state("device-watcher.0.offlineList").unwrap().unwrap().ack);
    }

    #[test]
    fn test_latch_and_notification_keys() {
        let alert = Alert::low_battery([("Sensor", "9%")]);
        assert_eq!(
            writer().notification(&alert),
            StateWrite {
                id: "device-watcher.0.lastNotification".to_string(),
                val: json!("\nSensor (9%)"),
            }
        );
        assert_eq!(writer().latch(true).id, "device-watcher.0.info.lastBatteryNotification");
    }

    #[test]
    fn test_failing_first_write_applies_nothing() {
        let writes = writer().results(&AggregatedLists::default(), epoch()).unwrap();
        let mut store = FaultyStore::new(MemoryStore::new())
            .failing_write("device-watcher.0.offlineCount");

        assert!(apply(&mut store, &writes).is_err());
        assert_eq!(store.inner().state_count(), 0);
    }

    #[test]
    fn test_later_write_failure_is_logged_and_skipped() {
        let writes = writer().results(&AggregatedLists::default(), epoch()).unwrap();
        let mut store = FaultyStore::new(MemoryStore::new())
            .failing_write("device-watcher.0.countAll");

        let failed = apply(&mut store, &writes).unwrap();
        assert_eq!(failed, vec!["device-watcher.0.countAll"]);
        assert_eq!(store.inner().state_count(), writes.len() - 1);
        assert!(store.value("device-watcher.0.listAll").unwrap().is_some());
        assert!(store.value("device-watcher.0.lastCheck").unwrap().is_some());
    }

    fn epoch() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
    }
}
