//! Alert notification system
//!
//! Provides the notification channels: push messages, chat bot and email
//! through the message bus, and two dashboard widgets written as states.

use super::types::Alert;
use crate::config::{
    DashboardConfig, EmailConfig, NotificationConfig, PushoverConfig, TelegramConfig,
};
use crate::error::NotifyError;
use crate::store::Host;

use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};

/// Timestamp format used in dashboard titles and `lastCheck`
pub const STAMP_FORMAT: &str = "%d.%m.%Y - %H:%M:%S";

/// Notification channel trait
pub trait Notifier {
    /// Send a notification for an alert
    fn notify(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        now: DateTime<FixedOffset>,
    ) -> Result<(), NotifyError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

fn send(
    host: &mut dyn Host,
    channel: &str,
    instance: &str,
    payload: Value,
) -> Result<(), NotifyError> {
    host.send_to(instance, "send", &payload)
        .map_err(|source| NotifyError::Transport {
            channel: channel.to_string(),
            source,
        })
}

fn write(host: &mut dyn Host, channel: &str, id: &str, text: String) -> Result<(), NotifyError> {
    host.set_state(id, Value::String(text), false)
        .map_err(|source| NotifyError::Transport {
            channel: channel.to_string(),
            source,
        })
}

fn stamped_title(title: &str, now: DateTime<FixedOffset>) -> String {
    format!("{} ({})", title, now.format(STAMP_FORMAT))
}

/// Push message notifier
pub struct PushoverNotifier {
    instance: String,
    title: String,
    device: String,
}

impl PushoverNotifier {
    pub fn new(instance: impl Into<String>, config: &PushoverConfig) -> Self {
        Self {
            instance: instance.into(),
            title: config.title.clone(),
            device: config.device.clone(),
        }
    }
}

impl Notifier for PushoverNotifier {
    fn notify(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        _now: DateTime<FixedOffset>,
    ) -> Result<(), NotifyError> {
        let payload = json!({
            "message": alert.message,
            "title": self.title,
            "device": self.device,
        });
        send(host, self.name(), &self.instance, payload)
    }

    fn name(&self) -> &str {
        "pushover"
    }
}

/// Chat bot notifier
pub struct TelegramNotifier {
    instance: String,
    user: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(instance: impl Into<String>, config: &TelegramConfig) -> Self {
        Self {
            instance: instance.into(),
            user: config.user.clone(),
            chat_id: config.chat_id.clone(),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        _now: DateTime<FixedOffset>,
    ) -> Result<(), NotifyError> {
        let payload = json!({
            "text": alert.message,
            "user": self.user,
            "chatId": self.chat_id,
        });
        send(host, self.name(), &self.instance, payload)
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// Email notifier
pub struct EmailNotifier {
    instance: String,
    subject: String,
    send_to: String,
}

impl EmailNotifier {
    pub fn new(instance: impl Into<String>, config: &EmailConfig) -> Self {
        Self {
            instance: instance.into(),
            subject: config.subject.clone(),
            send_to: config.send_to.clone(),
        }
    }
}

impl Notifier for EmailNotifier {
    fn notify(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        _now: DateTime<FixedOffset>,
    ) -> Result<(), NotifyError> {
        let payload = json!({
            "sendTo": self.send_to,
            "text": alert.message,
            "subject": self.subject,
        });
        send(host, self.name(), &self.instance, payload)
    }

    fn name(&self) -> &str {
        "email"
    }
}

/// Drawer notification of the jarvis dashboard
pub struct JarvisNotifier {
    instance: String,
    title: String,
}

impl JarvisNotifier {
    pub fn new(instance: impl Into<String>, config: &DashboardConfig) -> Self {
        Self {
            instance: instance.into(),
            title: config.title.clone(),
        }
    }
}

impl Notifier for JarvisNotifier {
    fn notify(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        now: DateTime<FixedOffset>,
    ) -> Result<(), NotifyError> {
        let text = serde_json::to_string(&json!({
            "title": stamped_title(&self.title, now),
            "message": alert.summary,
            "display": "drawer",
        }))?;
        let id = format!("{}.addNotification", self.instance);
        write(host, self.name(), &id, text)
    }

    fn name(&self) -> &str {
        "jarvis"
    }
}

/// Notification card of the lovelace dashboard
pub struct LovelaceNotifier {
    instance: String,
    title: String,
}

impl LovelaceNotifier {
    pub fn new(instance: impl Into<String>, config: &DashboardConfig) -> Self {
        Self {
            instance: instance.into(),
            title: config.title.clone(),
        }
    }
}

impl Notifier for LovelaceNotifier {
    fn notify(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        now: DateTime<FixedOffset>,
    ) -> Result<(), NotifyError> {
        let text = serde_json::to_string(&json!({
            "message": alert.summary,
            "title": stamped_title(&self.title, now),
        }))?;
        let id = format!("{}.notifications.add", self.instance);
        write(host, self.name(), &id, text)
    }

    fn name(&self) -> &str {
        "lovelace"
    }
}

/// Notification manager
///
/// Manages multiple notification channels and dispatches alerts to them
pub struct NotificationManager {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationManager {
    /// Create a new notification manager
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Create the channels that have an instance configured
    pub fn from_config(config: &NotificationConfig) -> Self {
        let mut manager = Self::new();

        if let Some(c) = &config.pushover {
            if let Some(instance) = enabled(c.instance.as_deref()) {
                manager.add_notifier(Box::new(PushoverNotifier::new(instance, c)));
            }
        }
        if let Some(c) = &config.telegram {
            if let Some(instance) = enabled(c.instance.as_deref()) {
                manager.add_notifier(Box::new(TelegramNotifier::new(instance, c)));
            }
        }
        if let Some(c) = &config.email {
            if let Some(instance) = enabled(c.instance.as_deref()) {
                manager.add_notifier(Box::new(EmailNotifier::new(instance, c)));
            }
        }
        if let Some(c) = &config.jarvis {
            if let Some(instance) = enabled(c.instance.as_deref()) {
                manager.add_notifier(Box::new(JarvisNotifier::new(instance, c)));
            }
        }
        if let Some(c) = &config.lovelace {
            if let Some(instance) = enabled(c.instance.as_deref()) {
                manager.add_notifier(Box::new(LovelaceNotifier::new(instance, c)));
            }
        }

        manager
    }

    /// Add a notifier
    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Send notification to all channels
    ///
    /// A failing channel is logged and does not stop the others. Returns the
    /// names of the channels that delivered.
    pub fn notify_all(
        &self,
        host: &mut dyn Host,
        alert: &Alert,
        now: DateTime<FixedOffset>,
    ) -> Vec<String> {
        let mut delivered = Vec::new();
        for notifier in &self.notifiers {
            match notifier.notify(host, alert, now) {
                Ok(()) => delivered.push(notifier.name().to_string()),
                Err(e) => log::warn!("Failed to notify via {}: {}", notifier.name(), e),
            }
        }
        delivered
    }

    /// Names of the active channels
    pub fn channel_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Get number of active notifiers
    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured, non-empty instance identifier
fn enabled(instance: Option<&str>) -> Option<&str> {
    instance.map(str::trim).filter(|i| !i.is_empty())
}
