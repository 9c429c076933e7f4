//! Device resolver
//!
//! Expands a profile's selector into concrete devices, drops blacklisted
//! ones and resolves their display names.

use crate::config::BlacklistConfig;
use crate::domain::{AdapterProfile, DeviceKeys, ResolvedDevice};
use crate::error::{Result, StoreError};
use crate::store::value::display;
use crate::store::{ObjectStore, StateSample, StateStore};

/// Resolves the devices of one profile
pub struct DeviceResolver<'a> {
    blacklist: &'a BlacklistConfig,
}

impl<'a> DeviceResolver<'a> {
    /// Create a resolver honouring a blacklist
    pub fn new(blacklist: &'a BlacklistConfig) -> Self {
        Self { blacklist }
    }

    /// Resolve all devices of a profile in store order
    ///
    /// Failing to enumerate the selector is an error. Failures on a single
    /// matched key are logged and that key is skipped.
    pub fn resolve<'p, S>(
        &self,
        store: &S,
        profile: &'p AdapterProfile,
    ) -> std::result::Result<Vec<ResolvedDevice<'p>>, StoreError>
    where
        S: StateStore + ObjectStore + ?Sized,
    {
        let matched = store.states_matching(profile.selector)?;
        log::debug!("{}: {} keys match {}", profile.id, matched.len(), profile.selector);

        let mut devices = Vec::with_capacity(matched.len());
        for (key, sample) in matched {
            match self.resolve_key(store, profile, &key, sample) {
                Ok(Some(device)) => devices.push(device),
                Ok(None) => log::debug!("Skipping blacklisted device {}", key),
                Err(e) => log::warn!("Skipping {}: {}", key, e),
            }
        }

        Ok(devices)
    }

    fn resolve_key<'p, S>(
        &self,
        store: &S,
        profile: &'p AdapterProfile,
        key: &str,
        quality: StateSample,
    ) -> Result<Option<ResolvedDevice<'p>>>
    where
        S: StateStore + ObjectStore + ?Sized,
    {
        let keys = DeviceKeys::from_matched(key)?;
        if self.blacklist.contains(&keys.device) {
            return Ok(None);
        }

        let name = self.display_name(store, profile, &keys)?;

        Ok(Some(ResolvedDevice {
            profile,
            keys,
            name,
            quality,
        }))
    }

    fn display_name<S>(&self, store: &S, profile: &AdapterProfile, keys: &DeviceKeys) -> Result<String>
    where
        S: StateStore + ObjectStore + ?Sized,
    {
        if let Some(path) = profile.secondary_id {
            if let Some(id) = store.value(&keys.device_path(path))? {
                return Ok(display(&id));
            }
        }

        let mut name = None;
        if profile.name_from_parent {
            if let Some(parent) = &keys.parent {
                name = store.object(parent)?.and_then(|meta| meta.name);
            }
        }
        if name.is_none() {
            name = store.object(&keys.device)?.and_then(|meta| meta.name);
        }

        Ok(name.unwrap_or_else(|| keys.device.clone()))
    }
}
