//! Run orchestrator
//!
//! One pass over all enabled profiles: collect the lists, evaluate the
//! alerts, then persist and dispatch. Nothing is written or sent when
//! collecting fails or the store rejects the first write.

use crate::alerts::{AlertManager, AlertManagerConfig, AlertState, NotificationManager};
use crate::config::Config;
use crate::domain::AggregatedLists;
use crate::error::Result;
use crate::services::aggregator::Aggregator;
use crate::services::extractor::MetricExtractor;
use crate::services::persistence::{self, OutputWriter, StateWrite};
use crate::services::registry::ProfileRegistry;
use crate::services::resolver::DeviceResolver;
use crate::store::{Host, ObjectStore, StateStore};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Run instant
    pub checked_at: String,
    /// Nothing was written or sent
    pub dry_run: bool,
    /// Enabled profile ids
    pub profiles: Vec<String>,
    pub count_all: usize,
    pub offline_count: usize,
    pub link_quality_count: usize,
    pub battery_count: usize,
    pub low_battery_count: usize,
    pub offline_alert: AlertState,
    pub low_battery_alert: AlertState,
    /// Channels that delivered, one entry per alert and channel
    pub notified: Vec<String>,
    /// State writes performed or, in dry run, planned
    pub writes: Vec<StateWrite>,
    /// Ids of planned writes the store rejected
    pub failed_writes: Vec<String>,
    /// The lists of the run
    #[serde(skip)]
    pub lists: AggregatedLists,
}

/// Device watcher
pub struct Watcher {
    config: Config,
    registry: ProfileRegistry,
    alerts: AlertManager,
    notifications: NotificationManager,
    writer: OutputWriter,
}

impl Watcher {
    /// Create a watcher with the given configuration
    pub fn new(config: Config) -> Self {
        let registry = ProfileRegistry::new(&config.adapters);
        let alerts = AlertManager::new(AlertManagerConfig::from_config(&config));
        let notifications = NotificationManager::from_config(&config.notifications);
        let writer = OutputWriter::new(config.general.namespace.clone());

        Self {
            config,
            registry,
            alerts,
            notifications,
            writer,
        }
    }

    /// Get the watcher configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the enabled profiles
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Resolve, observe and aggregate all devices
    pub fn collect<S>(&self, store: &S, now: DateTime<FixedOffset>) -> Result<AggregatedLists>
    where
        S: StateStore + ObjectStore + ?Sized,
    {
        let resolver = DeviceResolver::new(&self.config.blacklist);
        let extractor = MetricExtractor::new(&self.config);
        let mut aggregator = Aggregator::new(self.config.listing.only_battery);

        for profile in self.registry.enabled_profiles() {
            let devices = resolver.resolve(store, profile)?;
            log::debug!("{}: {} devices", profile.id, devices.len());

            for device in &devices {
                let obs = extractor.extract(store, device, now);
                aggregator.record(device, &obs);
            }
        }

        Ok(aggregator.finish())
    }

    /// Execute one full pass
    pub fn run(&self, host: &mut dyn Host, now: DateTime<FixedOffset>) -> Result<RunSummary> {
        let dry_run = self.config.general.dry_run;

        let lists = self.collect(&*host, now)?;
        let state = self.writer.load_state(&*host)?;
        let decision = self.alerts.evaluate(&lists, state, now);

        let mut writes: Vec<StateWrite> = decision
            .alerts
            .iter()
            .map(|alert| self.writer.notification(alert))
            .collect();
        writes.extend(self.writer.results(&lists, now)?);
        if decision.latch_changed {
            writes.push(self.writer.latch(decision.next.battery_notified_today));
        }

        let mut notified = Vec::new();
        let mut failed_writes = Vec::new();
        if dry_run {
            for alert in &decision.alerts {
                log::info!(
                    "Dry run: would send {} alert via {:?}: {}",
                    alert.kind,
                    self.notifications.channel_names(),
                    alert.message
                );
            }
            for write in &writes {
                log::info!("Dry run: would write {} = {}", write.id, write.val);
            }
        } else {
            failed_writes = persistence::apply(&mut *host, &writes)?;
            for alert in &decision.alerts {
                notified.extend(self.notifications.notify_all(host, alert, now));
            }
        }

        Ok(RunSummary {
            checked_at: now.to_rfc3339(),
            dry_run,
            profiles: self
                .registry
                .enabled_profiles()
                .iter()
                .map(|p| p.id.to_string())
                .collect(),
            count_all: lists.count_all(),
            offline_count: lists.offline_count(),
            link_quality_count: lists.link_quality_count(),
            battery_count: lists.battery_count(),
            low_battery_count: lists.low_battery_count(),
            offline_alert: decision.offline,
            low_battery_alert: decision.low_battery,
            notified,
            writes,
            failed_writes,
            lists,
        })
    }
}
