//! Domain models for devwatch
//!
//! Profiles, resolved devices, per-device metrics and the display records
//! handed to the persistence layer.

pub mod device;
pub mod metrics;
pub mod profile;
pub mod records;

pub use device::{parent_of, DeviceKeys, ResolvedDevice};
pub use metrics::{
    normalize_link_quality, BatteryHealth, LastContact, LinkQuality, Observation, UNAVAILABLE,
};
pub use profile::{AdapterProfile, BatteryUnit, ReachField, ReachPolarity};
pub use records::{
    list_or_placeholder, AggregatedLists, BatteryRecord, DeviceRecord, LinkQualityRecord,
    ListRecord, OfflineRecord, NO_DEVICES,
};
