//! Alert manager implementation
//!
//! Evaluates the offline and low battery alerts of a run against the
//! persisted notification state. Evaluation is pure: the caller persists
//! and dispatches the resulting decision.

use super::types::{Alert, AlertKind, AlertState, NotificationState};
use crate::config::{Config, WeekdayConfig};
use crate::domain::AggregatedLists;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// Alert rules taken from the configuration
#[derive(Debug, Clone)]
pub struct AlertManagerConfig {
    /// Offline alert enabled
    pub offline: bool,
    /// Low battery alert enabled
    pub low_battery: bool,
    /// Local hour from which the low battery alert may fire
    pub check_hour: u32,
    /// Weekdays on which the low battery alert may fire
    pub days: WeekdayConfig,
    /// Battery percentage below which a device is reported
    pub min_warn_battery: f64,
}

impl AlertManagerConfig {
    /// Extract the alert rules from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            offline: config.notifications.offline,
            low_battery: config.notifications.low_battery,
            check_hour: config.notifications.check_hour,
            days: config.notifications.days.clone(),
            min_warn_battery: config.thresholds.min_warn_battery,
        }
    }
}

impl Default for AlertManagerConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of evaluating all alerts of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Offline alert outcome
    pub offline: AlertState,
    /// Low battery alert outcome
    pub low_battery: AlertState,
    /// Fired alerts in dispatch order
    pub alerts: Vec<Alert>,
    /// State to persist for the next run
    pub next: NotificationState,
    /// Whether the low battery latch must be written
    pub latch_changed: bool,
}

impl Decision {
    /// The fired alert of a kind, if any
    pub fn alert(&self, kind: AlertKind) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.kind == kind)
    }
}

/// Alert manager
pub struct AlertManager {
    config: AlertManagerConfig,
}

impl AlertManager {
    /// Create a new alert manager
    pub fn new(config: AlertManagerConfig) -> Self {
        Self { config }
    }

    /// Get the alert rules
    pub fn config(&self) -> &AlertManagerConfig {
        &self.config
    }

    /// Evaluate both alerts for the lists of a run
    pub fn evaluate(
        &self,
        lists: &AggregatedLists,
        state: NotificationState,
        now: DateTime<FixedOffset>,
    ) -> Decision {
        let mut alerts = Vec::new();

        let (offline, offline_alert) = self.evaluate_offline(lists, state);
        alerts.extend(offline_alert);

        let (low_battery, battery_alert, latch) = self.evaluate_low_battery(lists, state, now);
        alerts.extend(battery_alert);

        for alert in &alerts {
            log::info!("{} alert fired for {} devices", alert.kind, alert.count);
        }

        Decision {
            offline,
            low_battery,
            alerts,
            next: NotificationState {
                offline_count: lists.offline_count(),
                battery_notified_today: latch.unwrap_or(state.battery_notified_today),
            },
            latch_changed: latch.is_some(),
        }
    }

    fn evaluate_offline(
        &self,
        lists: &AggregatedLists,
        state: NotificationState,
    ) -> (AlertState, Option<Alert>) {
        if !self.config.offline {
            return (AlertState::Idle, None);
        }

        let count = lists.offline_count();
        if count == state.offline_count || count == 0 {
            return (AlertState::Armed, None);
        }

        let alert = Alert::offline(
            lists
                .offline
                .iter()
                .map(|r| (r.device.as_str(), r.last_contact.as_str())),
        );
        (AlertState::Fired, Some(alert))
    }

    /// Returns the outcome, the alert and the latch value to write
    fn evaluate_low_battery(
        &self,
        lists: &AggregatedLists,
        state: NotificationState,
        now: DateTime<FixedOffset>,
    ) -> (AlertState, Option<Alert>, Option<bool>) {
        if !self.config.low_battery {
            return (AlertState::Idle, None, None);
        }

        if now.hour() < self.config.check_hour {
            return (AlertState::Idle, None, Some(false));
        }

        let check_today = self.config.days.contains(now.weekday());
        if state.battery_notified_today || !check_today {
            return (AlertState::Idle, None, None);
        }

        let low: Vec<_> = lists
            .battery
            .iter()
            .filter(|r| r.percent.is_some_and(|p| p < self.config.min_warn_battery))
            .collect();
        if low.is_empty() {
            return (AlertState::Armed, None, None);
        }

        let alert = Alert::low_battery(low.iter().map(|r| (r.device.as_str(), r.battery.as_str())));
        (AlertState::Fired, Some(alert), Some(true))
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(AlertManagerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatteryRecord, OfflineRecord};
    use chrono::TimeZone;

    /// 2024-05-06 is a Monday
    fn monday_at(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 6, hour, 0, 0)
            .unwrap()
    }

    fn manager() -> AlertManager {
        let mut config = AlertManagerConfig::default();
        config.days = WeekdayConfig::every_day();
        AlertManager::new(config)
    }

    fn offline_lists(count: usize) -> AggregatedLists {
        let mut lists = AggregatedLists::default();
        for i in 0..count {
            lists.offline.push(OfflineRecord {
                device: format!("Device {}", i),
                adapter: "Zigbee".to_string(),
                last_contact: "3 Stunden".to_string(),
            });
        }
        lists
    }

    fn battery(device: &str, text: &str, percent: Option<f64>) -> BatteryRecord {
        BatteryRecord {
            device: device.to_string(),
            adapter: "Zigbee".to_string(),
            battery: text.to_string(),
            percent,
        }
    }

    fn state(offline_count: usize, latch: bool) -> NotificationState {
        NotificationState {
            offline_count,
            battery_notified_today: latch,
        }
    }

    #[test]
    fn test_offline_unchanged_count_does_not_fire() {
        let decision = manager().evaluate(&offline_lists(2), state(2, false), monday_at(9));
        assert_eq!(decision.offline, AlertState::Armed);
        assert!(decision.alert(AlertKind::Offline).is_none());
        assert_eq!(decision.next.offline_count, 2);
    }

    #[test]
    fn test_offline_zero_does_not_fire() {
        let decision = manager().evaluate(&offline_lists(0), state(2, false), monday_at(9));
        assert!(decision.alerts.is_empty());
        assert_eq!(decision.next.offline_count, 0);
    }

    #[test]
    fn test_offline_fires_singular() {
        let decision = manager().evaluate(&offline_lists(1), state(0, false), monday_at(9));
        assert_eq!(decision.offline, AlertState::Fired);
        let alert = decision.alert(AlertKind::Offline).unwrap();
        assert!(alert.message.starts_with("Folgendes Gerät"));
        assert_eq!(decision.next.offline_count, 1);
    }

    #[test]
    fn test_offline_disabled_still_tracks_count() {
        let mut config = AlertManagerConfig::default();
        config.offline = false;
        let decision =
            AlertManager::new(config).evaluate(&offline_lists(3), state(0, false), monday_at(9));
        assert_eq!(decision.offline, AlertState::Idle);
        assert!(decision.alerts.is_empty());
        assert_eq!(decision.next.offline_count, 3);
    }

    #[test]
    fn test_latch_cleared_before_check_hour() {
        let mut lists = AggregatedLists::default();
        lists.battery.push(battery("Sensor", "5%", Some(5.0)));

        let decision = manager().evaluate(&lists, state(0, true), monday_at(10));
        assert_eq!(decision.low_battery, AlertState::Idle);
        assert!(decision.alerts.is_empty());
        assert!(decision.latch_changed);
        assert!(!decision.next.battery_notified_today);
    }

    #[test]
    fn test_low_battery_fires_once_and_sets_latch() {
        let mut lists = AggregatedLists::default();
        lists.battery.push(battery("Sensor", "12%", Some(12.0)));
        lists.battery.push(battery("Remote", "80%", Some(80.0)));
        lists.battery.push(battery("Thermostat", "2.2V", None));

        let decision = manager().evaluate(&lists, state(0, false), monday_at(12));
        assert_eq!(decision.low_battery, AlertState::Fired);
        let alert = decision.alert(AlertKind::LowBattery).unwrap();
        assert_eq!(alert.count, 1);
        assert_eq!(alert.record, "\nSensor (12%)");
        assert!(decision.latch_changed);
        assert!(decision.next.battery_notified_today);

        lists.battery.push(battery("Lock", "3%", Some(3.0)));
        let later = manager().evaluate(&lists, decision.next, monday_at(14));
        assert_eq!(later.low_battery, AlertState::Idle);
        assert!(later.alerts.is_empty());
        assert!(!later.latch_changed);
        assert!(later.next.battery_notified_today);
    }

    #[test]
    fn test_low_battery_fires_at_check_hour() {
        let mut lists = AggregatedLists::default();
        lists.battery.push(battery("Sensor", "12%", Some(12.0)));

        let decision = manager().evaluate(&lists, state(0, false), monday_at(11));
        assert_eq!(decision.low_battery, AlertState::Fired);
    }

    #[test]
    fn test_no_low_devices_keeps_latch_open() {
        let mut lists = AggregatedLists::default();
        lists.battery.push(battery("Remote", "80%", Some(80.0)));

        let decision = manager().evaluate(&lists, state(0, false), monday_at(12));
        assert_eq!(decision.low_battery, AlertState::Armed);
        assert!(!decision.latch_changed);
        assert!(!decision.next.battery_notified_today);
    }

    #[test]
    fn test_weekday_gate() {
        let mut config = AlertManagerConfig::default();
        config.days.tuesday = true;
        let mut lists = AggregatedLists::default();
        lists.battery.push(battery("Sensor", "12%", Some(12.0)));

        let decision = AlertManager::new(config).evaluate(&lists, state(0, false), monday_at(12));
        assert_eq!(decision.low_battery, AlertState::Idle);
        assert!(decision.alerts.is_empty());
    }

    #[test]
    fn test_low_battery_disabled_leaves_latch() {
        let mut config = AlertManagerConfig::default();
        config.low_battery = false;
        let decision = AlertManager::new(config).evaluate(
            &AggregatedLists::default(),
            state(0, true),
            monday_at(8),
        );
        assert!(!decision.latch_changed);
        assert!(decision.next.battery_notified_today);
    }

    #[test]
    fn test_offline_before_battery() {
        let mut lists = offline_lists(1);
        lists.battery.push(battery("Sensor", "12%", Some(12.0)));

        let decision = manager().evaluate(&lists, state(0, false), monday_at(12));
        let kinds: Vec<_> = decision.alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::Offline, AlertKind::LowBattery]);
    }
}
