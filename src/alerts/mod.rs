//! Alert and notification system
//!
//! Offline and low battery alerts with deduplication across runs and
//! multiple notification channels.

mod manager;
mod notifier;
mod types;

pub use manager::{AlertManager, AlertManagerConfig, Decision};
pub use notifier::{
    EmailNotifier, JarvisNotifier, LovelaceNotifier, NotificationManager, Notifier,
    PushoverNotifier, TelegramNotifier, STAMP_FORMAT,
};
pub use types::{Alert, AlertKind, AlertState, NotificationState};
