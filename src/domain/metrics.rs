//! Per-device health metrics
//!
//! Normalized link quality, last contact buckets and battery health, each
//! with an explicit "unavailable" case that renders as the ` - ` sentinel.

use crate::store::value::{display, format_number};
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::fmt;

/// Display text of any unavailable metric
pub const UNAVAILABLE: &str = " - ";

/// Minutes after which last contact is shown in hours
pub const HOURS_AFTER_MINUTES: i64 = 100;

/// Minutes after which last contact is shown in days
pub const DAYS_AFTER_MINUTES: i64 = 48 * 60;

/// Map a raw signal sample to a percentage
///
/// Negative samples are dBm-like RSSI values, non-negative samples are on a
/// 0..=255 LQI scale.
pub fn normalize_link_quality(raw: f64) -> f64 {
    if raw < 0.0 {
        (2.0 * (raw + 100.0)).clamp(0.0, 100.0)
    } else {
        (raw * 100.0 / 255.0).round()
    }
}

/// Link quality of a device
#[derive(Debug, Clone, PartialEq)]
pub enum LinkQuality {
    /// Raw sample passed through unchanged
    Raw(String),
    /// Normalized percentage
    Percent(f64),
    /// Sample was not numeric
    Unavailable,
}

impl LinkQuality {
    /// Classify a raw quality sample
    pub fn from_sample(val: &Value, pass_through: bool) -> Self {
        match val {
            Value::Number(_) if pass_through => Self::Raw(display(val)),
            Value::Number(n) => n
                .as_f64()
                .map(|raw| Self::Percent(normalize_link_quality(raw)))
                .unwrap_or(Self::Unavailable),
            _ => Self::Unavailable,
        }
    }

    /// Whether the device reported a numeric sample
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for LinkQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => write!(f, "{}", raw),
            Self::Percent(p) => write!(f, "{}%", format_number(*p)),
            Self::Unavailable => write!(f, "{}", UNAVAILABLE),
        }
    }
}

/// Time since the quality state was last updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastContact {
    /// Recent contact, local wall clock `HH:MM`
    TimeOfDay(String),
    /// Hours ago
    Hours(i64),
    /// Days ago
    Days(i64),
    /// Sample time could not be evaluated
    Unknown,
}

impl LastContact {
    /// Bucket an elapsed time
    ///
    /// Branches apply in order and later ones override earlier ones.
    pub fn from_elapsed(elapsed_minutes: i64, sampled_at: DateTime<FixedOffset>) -> Self {
        let mut contact = Self::TimeOfDay(sampled_at.format("%H:%M").to_string());

        if elapsed_minutes > HOURS_AFTER_MINUTES {
            contact = Self::Hours((elapsed_minutes as f64 / 60.0).round() as i64);
        }
        if elapsed_minutes > DAYS_AFTER_MINUTES {
            contact = Self::Days((elapsed_minutes as f64 / 60.0 / 24.0).round() as i64);
        }

        contact
    }
}

impl fmt::Display for LastContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeOfDay(time) => write!(f, "{} Uhr", time),
            Self::Hours(h) => write!(f, "{} Stunden", h),
            Self::Days(d) => write!(f, "{} Tagen", d),
            Self::Unknown => write!(f, "{}", UNAVAILABLE),
        }
    }
}

/// Battery state of a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatteryHealth {
    /// Charge level, raw display text without unit
    Percent(String),
    /// Supply voltage, raw display text without unit
    Voltage(String),
    /// No usable reading
    Unavailable,
}

impl BatteryHealth {
    /// Numeric charge level, only for percentage readings
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::Percent(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Whether a reading was formatted
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for BatteryHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(text) => write!(f, "{}%", text),
            Self::Voltage(text) => write!(f, "{}V", text),
            Self::Unavailable => write!(f, "{}", UNAVAILABLE),
        }
    }
}

/// Everything extracted for one device in one run
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub link_quality: LinkQuality,
    pub last_contact: LastContact,
    pub offline: bool,
    pub battery: BatteryHealth,
    pub low_battery: bool,
    /// A primary or parent battery state exists, formatted or not
    pub has_battery_reading: bool,
}
