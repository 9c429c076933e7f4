//! Profile registry
//!
//! Static catalogue of supported vendor integrations, filtered by the
//! per-adapter enable flags.

use crate::config::AdapterConfig;
use crate::domain::AdapterProfile;

/// Every supported profile in processing order
pub fn catalogue() -> Vec<AdapterProfile> {
    vec![
        AdapterProfile::new("ble", "ble.*.rssi", "Ble").with_battery(".battery"),
        AdapterProfile::new("zigbee", "zigbee.*.link_quality", "Zigbee").with_battery(".battery"),
        AdapterProfile::new("sonoff", "sonoff.*.Wifi_RSSI", "Sonoff").with_battery(".battery"),
        AdapterProfile::new("shelly", "shelly.*.rssi", "Shelly").with_battery(".sensor.battery"),
        AdapterProfile::new("homematic", "hm-rpc.*.RSSI_DEVICE", "Homematic")
            .with_voltage(".OPERATING_VOLTAGE")
            .with_unreach(".UNREACH")
            .with_low_battery(".LOW_BAT"),
        AdapterProfile::new("deconz", "deconz.*.reachable", "Deconz")
            .with_battery(".battery")
            .with_reach(".reachable"),
        AdapterProfile::new("zwave", "zwave2.*.ready", "Zwave")
            .with_battery(".Battery.level")
            .with_reach(".ready")
            .with_low_battery(".Battery.isLow"),
        AdapterProfile::new("dect", "fritzdect.*.present", "FritzDect")
            .with_battery(".battery")
            .with_reach(".present")
            .with_low_battery(".batterylow"),
        AdapterProfile::new("hue", "hue.*.reachable", "Hue")
            .with_battery(".battery")
            .with_reach(".reachable"),
        AdapterProfile::new("hue_ext", "hue-extended.*.reachable", "Hue Extended")
            .with_battery(".config.battery")
            .battery_on_parent()
            .name_from_parent()
            .with_reach(".reachable"),
        AdapterProfile::new("ping", "ping.*.alive", "Ping").with_reach(".alive"),
        AdapterProfile::new("switchbot_ble", "switchbot-ble.*.rssi", "Switchbot Ble")
            .with_battery(".battery")
            .with_secondary_id(".id"),
        AdapterProfile::new("sonos", "sonos.*.alive", "Sonos").with_reach(".alive"),
        AdapterProfile::new("mihome", "mihome.*.state", "MiHome").with_battery(".percent"),
    ]
}

/// Registry of the profiles enabled for a run
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<AdapterProfile>,
}

impl ProfileRegistry {
    /// Select the enabled catalogue profiles, keeping catalogue order
    pub fn new(adapters: &AdapterConfig) -> Self {
        let profiles: Vec<_> = catalogue()
            .into_iter()
            .filter(|p| adapters.is_enabled(p.id))
            .collect();

        if profiles.is_empty() {
            log::warn!("No adapter enabled, all device lists will be empty");
        } else {
            let ids: Vec<_> = profiles.iter().map(|p| p.id).collect();
            log::info!("Enabled adapters: {}", ids.join(", "));
        }

        Self { profiles }
    }

    /// Enabled profiles in processing order
    pub fn enabled_profiles(&self) -> &[AdapterProfile] {
        &self.profiles
    }

    /// Whether no profile is enabled
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
