//! Alert system domain types
//!
//! Defines the alert kinds, the per-run decision state and the persisted
//! notification state carried between runs.

use serde::Serialize;
use std::fmt;

/// Alert kinds evaluated every run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Set of offline devices changed
    Offline,
    /// Daily low battery summary
    LowBattery,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "offline"),
            Self::LowBattery => write!(f, "low_battery"),
        }
    }
}

/// Outcome of evaluating one alert in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    /// Gate closed, nothing evaluated
    #[default]
    Idle,
    /// Gate open but no reason to fire
    Armed,
    /// Alert fired this run
    Fired,
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Armed => write!(f, "armed"),
            Self::Fired => write!(f, "fired"),
        }
    }
}

/// A fired alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Alert kind
    pub kind: AlertKind,
    /// Number of devices the alert is about
    pub count: usize,
    /// Message for text channels
    pub message: String,
    /// Text persisted as the last notification
    pub record: String,
    /// Short summary for dashboard widgets
    pub summary: String,
}

impl Alert {
    /// Offline alert listing `(device, last contact)` pairs
    pub fn offline<'a>(devices: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let devices: Vec<_> = devices.into_iter().collect();
        let count = devices.len();

        let mut message = if count == 1 {
            "Folgendes Gerät ist seit einiger Zeit nicht erreichbar: \n".to_string()
        } else {
            format!("Folgende {} Geräte sind seit einiger Zeit nicht erreichbar: \n", count)
        };
        for (device, last_contact) in devices {
            message.push_str(&format!("\n{} ({})", device, last_contact));
        }

        Self {
            kind: AlertKind::Offline,
            count,
            record: message.clone(),
            message,
            summary: format!(" {} Geräte sind nicht erreichbar", count),
        }
    }

    /// Low battery alert listing `(device, battery)` pairs
    pub fn low_battery<'a>(devices: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut count = 0;
        let mut infotext = String::new();
        for (device, battery) in devices {
            infotext.push_str(&format!("\n{} ({})", device, battery));
            count += 1;
        }

        Self {
            kind: AlertKind::LowBattery,
            count,
            message: format!("Batteriezustände: {}", infotext),
            record: infotext,
            summary: format!(" {} Geräte mit schwacher Batterie", count),
        }
    }
}

/// Dedup and latch values carried between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NotificationState {
    /// Offline count of the previous run
    pub offline_count: usize,
    /// Low battery alert already sent today
    pub battery_notified_today: bool,
}
