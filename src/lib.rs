//! devwatch - smart-home device watcher library
//!
//! This library provides the engine that classifies the health of
//! smart-home devices exposed by different vendor integrations, publishes
//! the results as states and decides when to send alerts.
//!
//! # Modules
//!
//! - [`alerts`]: Alert decisions and notification channels
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models
//! - [`error`]: Error types
//! - [`services`]: Run pipeline services
//! - [`store`]: State store abstraction layer

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
