//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};
use devwatch::config::{Config, EmailConfig, PushoverConfig, TelegramConfig, WeekdayConfig};
use devwatch::store::{MemoryStore, StateStore};
use serde_json::Value;

pub const NS: &str = "device-watcher.0";

/// Monday 2024-05-06 at the given local hour
pub fn at(hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 6, hour, 0, 0)
        .unwrap()
}

pub fn minutes_before(now: DateTime<FixedOffset>, minutes: i64) -> i64 {
    now.timestamp_millis() - minutes * 60_000
}

pub fn config() -> Config {
    let mut config = Config::default();
    config.adapters.zigbee = true;
    config.adapters.homematic = true;
    config.adapters.hue = true;
    config.blacklist.devices = vec!["zigbee.0.ccc".to_string()];
    config.notifications.days = WeekdayConfig::every_day();
    config
}

pub fn with_channels(mut config: Config) -> Config {
    config.notifications.pushover = Some(PushoverConfig {
        instance: Some("pushover.0".to_string()),
        title: "Geräte".to_string(),
        device: "phone".to_string(),
    });
    config.notifications.telegram = Some(TelegramConfig {
        instance: Some("telegram.0".to_string()),
        user: "me".to_string(),
        chat_id: "42".to_string(),
    });
    config.notifications.email = Some(EmailConfig {
        instance: Some("email.0".to_string()),
        subject: "Geräte".to_string(),
        send_to: "me@example.org".to_string(),
    });
    config
}

/// Window and Door on zigbee, a thermostat on homematic and a lamp on hue
pub fn home(now: DateTime<FixedOffset>) -> MemoryStore {
    let recent = minutes_before(now, 5);
    MemoryStore::new()
        .with_state("zigbee.0.aaa.link_quality", 255, recent)
        .with_state("zigbee.0.aaa.battery", 90, recent)
        .with_object("zigbee.0.aaa", "Window")
        .with_state("zigbee.0.bbb.link_quality", 40, minutes_before(now, 400))
        .with_state("zigbee.0.bbb.battery", 12, minutes_before(now, 400))
        .with_object("zigbee.0.bbb", "Door")
        .with_state("zigbee.0.ccc.link_quality", 10, minutes_before(now, 900))
        .with_object("zigbee.0.ccc", "Ignored")
        .with_state("hm-rpc.0.XYZ.0.RSSI_DEVICE", -60, recent)
        .with_state("hm-rpc.0.XYZ.0.OPERATING_VOLTAGE", 0, recent)
        .with_state("hm-rpc.0.XYZ.0.UNREACH", true, recent)
        .with_state("hm-rpc.0.XYZ.0.LOW_BAT", false, recent)
        .with_object("hm-rpc.0.XYZ.0", "Thermostat")
        .with_state("hue.0.lamp.reachable", true, recent)
        .with_object("hue.0.lamp", "Lamp")
}

pub fn value<S: StateStore>(store: &S, name: &str) -> Option<Value> {
    store.value(&format!("{}.{}", NS, name)).unwrap()
}

pub fn list<S: StateStore>(store: &S, name: &str) -> Vec<Value> {
    let raw = value(store, name).unwrap();
    serde_json::from_str(raw.as_str().unwrap()).unwrap()
}

pub fn devices(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["Device"].as_str().unwrap()).collect()
}
