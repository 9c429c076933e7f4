//! Display records and the aggregated lists of one run
//!
//! Field names are part of the downstream data contract and serialize
//! exactly as `Device`, `Adapter`, `Battery`, `Last_contact`, `Link_quality`.

use serde::{Deserialize, Serialize};

/// Device name used by the placeholder record of an empty list
pub const NO_DEVICES: &str = "--keine--";

/// Records that can stand in for an empty list
pub trait ListRecord: Serialize {
    /// The placeholder record written instead of an empty list
    fn placeholder() -> Self;
}

/// Entry of the full device list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Adapter")]
    pub adapter: String,
    #[serde(rename = "Battery")]
    pub battery: String,
    #[serde(rename = "Last_contact")]
    pub last_contact: String,
    #[serde(rename = "Link_quality")]
    pub link_quality: String,
}

impl ListRecord for DeviceRecord {
    fn placeholder() -> Self {
        Self {
            device: NO_DEVICES.to_string(),
            adapter: String::new(),
            battery: String::new(),
            last_contact: String::new(),
            link_quality: String::new(),
        }
    }
}

/// Entry of the link quality list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkQualityRecord {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Adapter")]
    pub adapter: String,
    #[serde(rename = "Link_quality")]
    pub link_quality: String,
}

impl ListRecord for LinkQualityRecord {
    fn placeholder() -> Self {
        Self {
            device: NO_DEVICES.to_string(),
            adapter: String::new(),
            link_quality: String::new(),
        }
    }
}

/// Entry of the offline list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineRecord {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Adapter")]
    pub adapter: String,
    #[serde(rename = "Last_contact")]
    pub last_contact: String,
}

impl ListRecord for OfflineRecord {
    fn placeholder() -> Self {
        Self {
            device: NO_DEVICES.to_string(),
            adapter: String::new(),
            last_contact: String::new(),
        }
    }
}

/// Entry of the battery and low battery lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryRecord {
    #[serde(rename = "Device")]
    pub device: String,
    #[serde(rename = "Adapter")]
    pub adapter: String,
    #[serde(rename = "Battery")]
    pub battery: String,
    /// Charge level for percentage readings, not part of the output contract
    #[serde(skip)]
    pub percent: Option<f64>,
}

impl ListRecord for BatteryRecord {
    fn placeholder() -> Self {
        Self {
            device: NO_DEVICES.to_string(),
            adapter: String::new(),
            battery: String::new(),
            percent: None,
        }
    }
}

/// The five categorized lists of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedLists {
    pub all: Vec<DeviceRecord>,
    pub offline: Vec<OfflineRecord>,
    pub link_quality: Vec<LinkQualityRecord>,
    pub battery: Vec<BatteryRecord>,
    pub low_battery: Vec<BatteryRecord>,
}

impl AggregatedLists {
    pub fn count_all(&self) -> usize {
        self.all.len()
    }

    pub fn offline_count(&self) -> usize {
        self.offline.len()
    }

    pub fn link_quality_count(&self) -> usize {
        self.link_quality.len()
    }

    pub fn battery_count(&self) -> usize {
        self.battery.len()
    }

    pub fn low_battery_count(&self) -> usize {
        self.low_battery.len()
    }
}

/// Serialize a list, substituting the placeholder record when empty
pub fn list_or_placeholder<T: ListRecord>(records: &[T]) -> serde_json::Result<String> {
    if records.is_empty() {
        serde_json::to_string(&[T::placeholder()])
    } else {
        serde_json::to_string(records)
    }
}
