//! Resolved device types

use super::profile::AdapterProfile;
use crate::error::DomainError;
use crate::store::StateSample;

/// Strip the last dot-separated segment of a key
///
/// Returns `None` when the key has a single segment.
pub fn parent_of(key: &str) -> Option<&str> {
    key.rfind('.').map(|idx| &key[..idx])
}

/// Device keys derived from a matched quality state key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceKeys {
    /// Matched key minus its last segment
    pub device: String,
    /// Device key minus its last segment
    pub parent: Option<String>,
}

impl DeviceKeys {
    /// Derive device and parent keys from a matched state key
    pub fn from_matched(matched: &str) -> Result<Self, DomainError> {
        let device = parent_of(matched)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DomainError::KeyWithoutDevice(matched.to_string()))?;

        Ok(Self {
            device: device.to_string(),
            parent: parent_of(device).map(str::to_string),
        })
    }

    /// Key of a sub-state below the device
    pub fn device_path(&self, sub: &str) -> String {
        format!("{}{}", self.device, sub)
    }

    /// Key of a sub-state below the parent
    pub fn parent_path(&self, sub: &str) -> Option<String> {
        self.parent.as_ref().map(|p| format!("{}{}", p, sub))
    }
}

/// A concrete device found for a profile in this run
#[derive(Debug, Clone)]
pub struct ResolvedDevice<'a> {
    /// Owning profile
    pub profile: &'a AdapterProfile,
    /// Device and parent keys
    pub keys: DeviceKeys,
    /// Display name
    pub name: String,
    /// The matched quality state itself
    pub quality: StateSample,
}

impl ResolvedDevice<'_> {
    /// Vendor label of the owning profile
    pub fn vendor(&self) -> &'static str {
        self.profile.vendor
    }
}
