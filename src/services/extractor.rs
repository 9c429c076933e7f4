//! Metric extractor
//!
//! Computes the normalized health observation of one resolved device. A
//! failing read only affects the metric it belongs to, which falls back to
//! its unavailable sentinel.

use crate::config::Config;
use crate::domain::{BatteryHealth, LastContact, LinkQuality, Observation, ResolvedDevice};
use crate::error::StoreError;
use crate::store::value::{as_numeric, display, is_truthy_opt};
use crate::store::StateStore;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// Raw battery readings of a device
#[derive(Debug, Clone, Default, PartialEq)]
struct BatteryReadings {
    /// Value at the device key
    primary: Option<Value>,
    /// Value one level above the device key
    short: Option<Value>,
}

impl BatteryReadings {
    fn is_present(&self) -> bool {
        self.primary.is_some() || self.short.is_some()
    }
}

/// Extracts observations for resolved devices
pub struct MetricExtractor {
    max_minutes: i64,
    min_warn_battery: f64,
    raw_link_quality: bool,
}

impl MetricExtractor {
    /// Create an extractor from the thresholds and listing options
    pub fn new(config: &Config) -> Self {
        Self {
            max_minutes: config.thresholds.max_minutes,
            min_warn_battery: config.thresholds.min_warn_battery,
            raw_link_quality: config.listing.raw_link_quality,
        }
    }

    /// Observe one device at the run instant
    pub fn extract<S>(&self, store: &S, device: &ResolvedDevice<'_>, now: DateTime<FixedOffset>) -> Observation
    where
        S: StateStore + ?Sized,
    {
        let link_quality = LinkQuality::from_sample(&device.quality.val, self.raw_link_quality);

        let elapsed = elapsed_minutes(device.quality.ts, now);
        let last_contact = match sampled_at(device.quality.ts, now) {
            Some(at) => LastContact::from_elapsed(elapsed, at),
            None => LastContact::Unknown,
        };

        let offline = self.offline(store, device, elapsed).unwrap_or_else(|e| {
            log::warn!("{}: reach state unavailable: {}", device.keys.device, e);
            false
        });

        let readings = battery_readings(store, device).unwrap_or_else(|e| {
            log::warn!("{}: battery state unavailable: {}", device.keys.device, e);
            BatteryReadings::default()
        });
        let battery = format_battery(device, &readings);

        let low_battery = self.low_battery(store, device, &readings).unwrap_or_else(|e| {
            log::warn!("{}: low battery state unavailable: {}", device.keys.device, e);
            false
        });

        log::debug!(
            "{} ({}): link {}, contact {}, battery {}, offline {}, low {}",
            device.name,
            device.vendor(),
            link_quality,
            last_contact,
            battery,
            offline,
            low_battery
        );

        Observation {
            link_quality,
            last_contact,
            offline,
            battery,
            low_battery,
            has_battery_reading: readings.is_present(),
        }
    }

    fn offline<S>(&self, store: &S, device: &ResolvedDevice<'_>, elapsed: i64) -> Result<bool, StoreError>
    where
        S: StateStore + ?Sized,
    {
        match device.profile.reach {
            None => Ok(elapsed > self.max_minutes),
            Some(reach) => {
                let val = store.value(&device.keys.device_path(reach.path))?;
                Ok(reach.is_offline(val.as_ref()))
            }
        }
    }

    fn low_battery<S>(
        &self,
        store: &S,
        device: &ResolvedDevice<'_>,
        readings: &BatteryReadings,
    ) -> Result<bool, StoreError>
    where
        S: StateStore + ?Sized,
    {
        match device.profile.low_battery {
            Some(path) => {
                let flag = store.value(&device.keys.device_path(path))?;
                Ok(is_truthy_opt(flag.as_ref()))
            }
            None => {
                let raw = if device.profile.battery_via_parent_only {
                    readings.short.as_ref()
                } else {
                    readings.primary.as_ref()
                };
                Ok(raw
                    .and_then(as_numeric)
                    .is_some_and(|level| level < self.min_warn_battery))
            }
        }
    }
}

/// Whole minutes between a sample and the run instant
fn elapsed_minutes(ts: i64, now: DateTime<FixedOffset>) -> i64 {
    let millis = now.timestamp_millis().saturating_sub(ts);
    (millis as f64 / 60_000.0).round() as i64
}

/// Sample time in the offset of the run instant
fn sampled_at(ts: i64, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp_millis(ts).map(|at| at.with_timezone(now.offset()))
}

fn battery_readings<S>(store: &S, device: &ResolvedDevice<'_>) -> Result<BatteryReadings, StoreError>
where
    S: StateStore + ?Sized,
{
    let Some(path) = device.profile.battery else {
        return Ok(BatteryReadings::default());
    };

    let primary = if device.profile.battery_via_parent_only {
        None
    } else {
        store.value(&device.keys.device_path(path))?
    };
    let short = match device.keys.parent_path(path) {
        Some(id) => store.value(&id)?,
        None => None,
    };

    Ok(BatteryReadings { primary, short })
}

fn format_battery(device: &ResolvedDevice<'_>, readings: &BatteryReadings) -> BatteryHealth {
    let profile = device.profile;

    if profile.battery_via_parent_only {
        return match &readings.short {
            Some(val) => BatteryHealth::Percent(display(val)),
            None => BatteryHealth::Unavailable,
        };
    }

    match &readings.primary {
        // 0 V means the device is not reporting
        Some(val) if profile.reports_voltage() => match as_numeric(val) {
            Some(volts) if volts == 0.0 => BatteryHealth::Unavailable,
            _ => BatteryHealth::Voltage(display(val)),
        },
        Some(val) => BatteryHealth::Percent(display(val)),
        None => BatteryHealth::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdapterProfile, DeviceKeys};
    use crate::mock::FaultyStore;
    use crate::services::registry::catalogue;
    use crate::store::{MemoryStore, StateSample};
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, 12, 0, 0)
            .unwrap()
    }

    fn minutes_ago(minutes: i64) -> i64 {
        now().timestamp_millis() - minutes * 60_000
    }

    fn profile(id: &str) -> AdapterProfile {
        catalogue().into_iter().find(|p| p.id == id).unwrap()
    }

    fn device<'a>(profile: &'a AdapterProfile, key: &str, val: Value, ts: i64) -> ResolvedDevice<'a> {
        ResolvedDevice {
            profile,
            keys: DeviceKeys::from_matched(key).unwrap(),
            name: "Test".to_string(),
            quality: StateSample::new(val, ts),
        }
    }

    fn extractor() -> MetricExtractor {
        MetricExtractor::new(&Config::default())
    }

    #[test]
    fn test_link_quality_and_recent_contact() {
        let zigbee = profile("zigbee");
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(255), minutes_ago(50));
        let obs = extractor().extract(&MemoryStore::new(), &dev, now());

        assert_eq!(obs.link_quality.to_string(), "100%");
        assert_eq!(obs.last_contact.to_string(), "11:10 Uhr");
        assert!(!obs.offline);
        assert_eq!(obs.battery, BatteryHealth::Unavailable);
        assert!(!obs.has_battery_reading);
    }

    #[test]
    fn test_raw_link_quality_pass_through() {
        let mut config = Config::default();
        config.listing.raw_link_quality = true;
        let ble = profile("ble");
        let dev = device(&ble, "ble.0.aa.rssi", json!(-67), minutes_ago(1));

        let obs = MetricExtractor::new(&config).extract(&MemoryStore::new(), &dev, now());
        assert_eq!(obs.link_quality.to_string(), "-67");
    }

    #[test]
    fn test_offline_by_elapsed_time() {
        let zigbee = profile("zigbee");
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(10), minutes_ago(301));
        let obs = extractor().extract(&MemoryStore::new(), &dev, now());
        assert!(obs.offline);
        assert_eq!(obs.last_contact, LastContact::Hours(5));

        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(10), minutes_ago(300));
        assert!(!extractor().extract(&MemoryStore::new(), &dev, now()).offline);
    }

    #[test]
    fn test_offline_by_reach_flag() {
        let hue = profile("hue");
        let store = MemoryStore::new().with_state("hue.0.lamp.reachable", false, 0);
        let dev = device(&hue, "hue.0.lamp.reachable", json!(false), minutes_ago(1));
        let obs = extractor().extract(&store, &dev, now());
        assert!(obs.offline);
        assert_eq!(obs.link_quality, LinkQuality::Unavailable);
    }

    #[test]
    fn test_offline_by_inverted_reach_flag() {
        let homematic = profile("homematic");
        let store = MemoryStore::new().with_state("hm-rpc.0.ABC.0.UNREACH", true, 0);
        let dev = device(&homematic, "hm-rpc.0.ABC.0.RSSI_DEVICE", json!(-50), minutes_ago(1));
        assert!(extractor().extract(&store, &dev, now()).offline);

        let store = MemoryStore::new();
        assert!(!extractor().extract(&store, &dev, now()).offline);
    }

    #[test]
    fn test_voltage_battery() {
        let homematic = profile("homematic");
        let dev = device(&homematic, "hm-rpc.0.ABC.0.RSSI_DEVICE", json!(-50), minutes_ago(1));

        let store = MemoryStore::new().with_state("hm-rpc.0.ABC.0.OPERATING_VOLTAGE", 3.1, 0);
        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery.to_string(), "3.1V");
        assert!(!obs.low_battery);

        let store = MemoryStore::new()
            .with_state("hm-rpc.0.ABC.0.OPERATING_VOLTAGE", 0, 0)
            .with_state("hm-rpc.0.ABC.0.LOW_BAT", true, 0);
        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery, BatteryHealth::Unavailable);
        assert!(obs.has_battery_reading);
        assert!(obs.low_battery);
    }

    #[test]
    fn test_battery_via_parent_only() {
        let hue_ext = profile("hue_ext");
        let dev = device(
            &hue_ext,
            "hue-extended.0.sensors.12.config.reachable",
            json!(true),
            minutes_ago(1),
        );

        let store = MemoryStore::new()
            .with_state("hue-extended.0.sensors.12.config.reachable", true, 0)
            .with_state("hue-extended.0.sensors.12.config.battery", 20, 0);
        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery.to_string(), "20%");
        assert!(obs.low_battery);

        let store = MemoryStore::new()
            .with_state("hue-extended.0.sensors.12.config.reachable", true, 0)
            .with_state("hue-extended.0.sensors.12.config.config.battery", 20, 0);
        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery, BatteryHealth::Unavailable);
        assert!(!obs.has_battery_reading);
    }

    #[test]
    fn test_absent_primary_battery_is_unavailable() {
        // Only a parent-level reading exists for a device-level profile
        let zigbee = profile("zigbee");
        let store = MemoryStore::new().with_state("zigbee.0.battery", 50, 0);
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(100), minutes_ago(1));

        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery, BatteryHealth::Unavailable);
        assert!(obs.has_battery_reading);
        assert!(!obs.low_battery);
    }

    #[test]
    fn test_low_battery_threshold() {
        let zigbee = profile("zigbee");
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(100), minutes_ago(1));

        let store = MemoryStore::new().with_state("zigbee.0.aaa.battery", 34, 0);
        assert!(extractor().extract(&store, &dev, now()).low_battery);

        let store = MemoryStore::new().with_state("zigbee.0.aaa.battery", 35, 0);
        assert!(!extractor().extract(&store, &dev, now()).low_battery);
    }

    #[test]
    fn test_dedicated_low_battery_flag_wins() {
        let zwave = profile("zwave");
        let store = MemoryStore::new()
            .with_state("zwave2.0.Node_3.ready", true, 0)
            .with_state("zwave2.0.Node_3.Battery.level", 10, 0)
            .with_state("zwave2.0.Node_3.Battery.isLow", false, 0);
        let dev = device(&zwave, "zwave2.0.Node_3.ready", json!(true), minutes_ago(1));

        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery.to_string(), "10%");
        assert!(!obs.low_battery);
    }

    #[test]
    fn test_failing_read_falls_back_to_sentinel() {
        let zigbee = profile("zigbee");
        let store = FaultyStore::new(MemoryStore::new()).failing_read("zigbee.0.aaa.battery");
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(100), minutes_ago(1));

        let obs = extractor().extract(&store, &dev, now());
        assert_eq!(obs.battery, BatteryHealth::Unavailable);
        assert!(!obs.low_battery);
        assert_eq!(obs.link_quality.to_string(), "39%");
    }

    #[test]
    fn test_last_contact_days() {
        let zigbee = profile("zigbee");
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(1), minutes_ago(3000));
        let obs = extractor().extract(&MemoryStore::new(), &dev, now());
        assert_eq!(obs.last_contact.to_string(), "2 Tagen");
    }

    #[test]
    fn test_extreme_timestamp_does_not_overflow() {
        let zigbee = profile("zigbee");
        let dev = device(&zigbee, "zigbee.0.aaa.link_quality", json!(1), i64::MIN);
        let obs = extractor().extract(&MemoryStore::new(), &dev, now());
        assert_eq!(obs.last_contact, LastContact::Unknown);
        assert!(obs.offline);
    }
}
