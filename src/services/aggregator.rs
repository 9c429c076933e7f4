//! Aggregator
//!
//! Accumulates device observations into the five lists of a run.

use crate::domain::{
    AggregatedLists, BatteryRecord, DeviceRecord, LinkQualityRecord, Observation, OfflineRecord,
    ResolvedDevice,
};

/// Run-scoped accumulation of device records
#[derive(Debug, Default)]
pub struct Aggregator {
    lists: AggregatedLists,
    only_battery: bool,
}

impl Aggregator {
    /// Start an empty pass
    pub fn new(only_battery: bool) -> Self {
        Self {
            lists: AggregatedLists::default(),
            only_battery,
        }
    }

    /// Append the records of one observed device
    pub fn record(&mut self, device: &ResolvedDevice<'_>, obs: &Observation) {
        let name = device.name.clone();
        let adapter = device.vendor().to_string();
        let battery = obs.battery.to_string();
        let last_contact = obs.last_contact.to_string();
        let link_quality = obs.link_quality.to_string();

        if obs.link_quality.is_available() {
            self.lists.link_quality.push(LinkQualityRecord {
                device: name.clone(),
                adapter: adapter.clone(),
                link_quality: link_quality.clone(),
            });
        }

        if obs.offline {
            self.lists.offline.push(OfflineRecord {
                device: name.clone(),
                adapter: adapter.clone(),
                last_contact: last_contact.clone(),
            });
        }

        if obs.battery.is_available() {
            self.lists.battery.push(BatteryRecord {
                device: name.clone(),
                adapter: adapter.clone(),
                battery: battery.clone(),
                percent: obs.battery.percent(),
            });
        }

        if obs.low_battery {
            self.lists.low_battery.push(BatteryRecord {
                device: name.clone(),
                adapter: adapter.clone(),
                battery: battery.clone(),
                percent: obs.battery.percent(),
            });
        }

        if !self.only_battery || obs.has_battery_reading {
            self.lists.all.push(DeviceRecord {
                device: name,
                adapter,
                battery,
                last_contact,
                link_quality,
            });
        }
    }

    /// Number of devices listed so far
    pub fn len(&self) -> usize {
        self.lists.count_all()
    }

    /// Whether nothing has been listed
    pub fn is_empty(&self) -> bool {
        self.lists.all.is_empty()
    }

    /// Finish the pass and hand out the lists
    pub fn finish(self) -> AggregatedLists {
        self.lists
    }
}
