//! Adapter profile types
//!
//! A profile describes how devices of one vendor integration are found in the
//! state store and where their health sub-signals live. Vendor differences
//! are carried as capability data so extraction never compares labels.

use crate::store::value::is_truthy_opt;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// What a truthy reach flag means for a vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachPolarity {
    /// `true` means the device is reachable
    ReachableWhenTrue,
    /// `true` means the device is unreachable
    UnreachableWhenTrue,
}

/// Sub-state reporting reachability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReachField {
    /// Path relative to the device key
    pub path: &'static str,
    /// Meaning of a truthy value
    pub polarity: ReachPolarity,
}

impl ReachField {
    /// Whether a reach value marks the device offline
    ///
    /// An absent value counts as falsy.
    pub fn is_offline(&self, val: Option<&Value>) -> bool {
        let flag = is_truthy_opt(val);
        match self.polarity {
            ReachPolarity::ReachableWhenTrue => !flag,
            ReachPolarity::UnreachableWhenTrue => flag,
        }
    }
}

/// Unit of the battery reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryUnit {
    /// Charge level in percent
    #[default]
    Percent,
    /// Supply voltage, `0` means "not reporting"
    Voltage,
}

impl fmt::Display for BatteryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent => write!(f, "%"),
            Self::Voltage => write!(f, "V"),
        }
    }
}

/// Static description of one vendor integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterProfile {
    /// Catalogue identifier, also the config enable key
    pub id: &'static str,
    /// Glob over state keys; each match is one device's quality state
    pub selector: &'static str,
    /// Vendor label shown in lists
    pub vendor: &'static str,
    /// Battery sub-path
    pub battery: Option<&'static str>,
    /// Unit of the battery sub-state
    pub battery_unit: BatteryUnit,
    /// Battery lives one level above the device key only
    pub battery_via_parent_only: bool,
    /// Reachability sub-state
    pub reach: Option<ReachField>,
    /// Dedicated low-battery flag sub-path
    pub low_battery: Option<&'static str>,
    /// Sibling state holding the display identifier
    pub secondary_id: Option<&'static str>,
    /// Display name lives on the parent object
    pub name_from_parent: bool,
}

impl AdapterProfile {
    /// Create a profile that only exposes its quality state
    pub fn new(id: &'static str, selector: &'static str, vendor: &'static str) -> Self {
        Self {
            id,
            selector,
            vendor,
            battery: None,
            battery_unit: BatteryUnit::Percent,
            battery_via_parent_only: false,
            reach: None,
            low_battery: None,
            secondary_id: None,
            name_from_parent: false,
        }
    }

    /// Builder: battery reported in percent at `path`
    pub fn with_battery(mut self, path: &'static str) -> Self {
        self.battery = Some(path);
        self
    }

    /// Builder: battery reported in volts at `path`
    pub fn with_voltage(mut self, path: &'static str) -> Self {
        self.battery = Some(path);
        self.battery_unit = BatteryUnit::Voltage;
        self
    }

    /// Builder: battery only available on the parent key
    pub fn battery_on_parent(mut self) -> Self {
        self.battery_via_parent_only = true;
        self
    }

    /// Builder: reach flag where `true` means reachable
    pub fn with_reach(mut self, path: &'static str) -> Self {
        self.reach = Some(ReachField {
            path,
            polarity: ReachPolarity::ReachableWhenTrue,
        });
        self
    }

    /// Builder: reach flag where `true` means unreachable
    pub fn with_unreach(mut self, path: &'static str) -> Self {
        self.reach = Some(ReachField {
            path,
            polarity: ReachPolarity::UnreachableWhenTrue,
        });
        self
    }

    /// Builder: dedicated low-battery flag
    pub fn with_low_battery(mut self, path: &'static str) -> Self {
        self.low_battery = Some(path);
        self
    }

    /// Builder: display identifier from a sibling state
    pub fn with_secondary_id(mut self, path: &'static str) -> Self {
        self.secondary_id = Some(path);
        self
    }

    /// Builder: display name from the parent object
    pub fn name_from_parent(mut self) -> Self {
        self.name_from_parent = true;
        self
    }

    /// Whether the battery reading is a voltage
    pub fn reports_voltage(&self) -> bool {
        self.battery_unit == BatteryUnit::Voltage
    }
}

impl fmt::Display for AdapterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.vendor)
    }
}
