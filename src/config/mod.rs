//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Per-adapter enable flags
    pub adapters: AdapterConfig,
    /// Offline and battery thresholds
    pub thresholds: ThresholdConfig,
    /// List rendering options
    pub listing: ListingConfig,
    /// Devices excluded from all processing
    pub blacklist: BlacklistConfig,
    /// Alert rules and channels
    pub notifications: NotificationConfig,
    /// State store location
    pub store: StoreConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Prefix of all engine-owned state keys
    pub namespace: String,
    /// Evaluate everything but write and send nothing
    pub dry_run: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            namespace: "device-watcher.0".to_string(),
            dry_run: false,
        }
    }
}

/// Adapter enable flags, one per catalogue profile
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdapterConfig {
    pub ble: bool,
    pub zigbee: bool,
    pub sonoff: bool,
    pub shelly: bool,
    pub homematic: bool,
    pub deconz: bool,
    pub zwave: bool,
    pub dect: bool,
    pub hue: bool,
    pub hue_ext: bool,
    pub ping: bool,
    pub switchbot_ble: bool,
    pub sonos: bool,
    pub mihome: bool,
}

impl AdapterConfig {
    /// Whether the profile with this catalogue id is enabled
    ///
    /// Unknown ids are never enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        match id {
            "ble" => self.ble,
            "zigbee" => self.zigbee,
            "sonoff" => self.sonoff,
            "shelly" => self.shelly,
            "homematic" => self.homematic,
            "deconz" => self.deconz,
            "zwave" => self.zwave,
            "dect" => self.dect,
            "hue" => self.hue,
            "hue_ext" => self.hue_ext,
            "ping" => self.ping,
            "switchbot_ble" => self.switchbot_ble,
            "sonos" => self.sonos,
            "mihome" => self.mihome,
            _ => false,
        }
    }

    /// Enable a profile by catalogue id, returns `false` for unknown ids
    pub fn enable(&mut self, id: &str) -> bool {
        let flag = match id {
            "ble" => &mut self.ble,
            "zigbee" => &mut self.zigbee,
            "sonoff" => &mut self.sonoff,
            "shelly" => &mut self.shelly,
            "homematic" => &mut self.homematic,
            "deconz" => &mut self.deconz,
            "zwave" => &mut self.zwave,
            "dect" => &mut self.dect,
            "hue" => &mut self.hue,
            "hue_ext" => &mut self.hue_ext,
            "ping" => &mut self.ping,
            "switchbot_ble" => &mut self.switchbot_ble,
            "sonos" => &mut self.sonos,
            "mihome" => &mut self.mihome,
            _ => return false,
        };
        *flag = true;
        true
    }
}

/// Threshold configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Minutes without contact before a device without reach flag is offline
    pub max_minutes: i64,
    /// Battery percentage below which a device counts as low
    pub min_warn_battery: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_minutes: 300,
            min_warn_battery: 35.0,
        }
    }
}

/// List rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    /// Report link quality samples verbatim instead of as percentages
    pub raw_link_quality: bool,
    /// Only list devices that report a battery state
    pub only_battery: bool,
}

/// Blacklist configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlacklistConfig {
    /// Device keys to skip
    pub devices: Vec<String>,
}

impl BlacklistConfig {
    /// Exact match against a device key
    pub fn contains(&self, device_key: &str) -> bool {
        self.devices.iter().any(|d| d == device_key)
    }
}

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Send an alert when the set of offline devices changes
    pub offline: bool,
    /// Send the daily low battery alert
    pub low_battery: bool,
    /// Local hour from which the low battery alert may fire
    pub check_hour: u32,
    /// Weekdays on which the low battery alert may fire
    pub days: WeekdayConfig,
    pub pushover: Option<PushoverConfig>,
    pub telegram: Option<TelegramConfig>,
    pub email: Option<EmailConfig>,
    pub jarvis: Option<DashboardConfig>,
    pub lovelace: Option<DashboardConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            offline: true,
            low_battery: true,
            check_hour: 11,
            days: WeekdayConfig::default(),
            pushover: None,
            telegram: None,
            email: None,
            jarvis: None,
            lovelace: None,
        }
    }
}

/// Weekday flags
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeekdayConfig {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl WeekdayConfig {
    /// Every day of the week
    pub fn every_day() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }

    /// Whether the set contains a weekday
    pub fn contains(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// Push message channel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PushoverConfig {
    pub instance: Option<String>,
    pub title: String,
    pub device: String,
}

/// Chat bot channel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelegramConfig {
    pub instance: Option<String>,
    pub user: String,
    pub chat_id: String,
}

/// Email channel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmailConfig {
    pub instance: Option<String>,
    pub subject: String,
    pub send_to: String,
}

/// Dashboard widget channel
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub instance: Option<String>,
    pub title: String,
}

/// State store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the state snapshot file
    pub path: Option<String>,
}
