//! Unified error types for devwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the external state/object store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the state/object store abstraction
#[derive(Error, Debug)]
pub enum StoreError {
    /// Selector pattern could not be compiled
    #[error("Invalid selector pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Snapshot file could not be read or written
    #[error("Snapshot unavailable at {path}: {message}")]
    Snapshot { path: String, message: String },

    /// Backend refused or failed a single read
    #[error("Failed to read '{0}'")]
    Read(String),

    /// Backend refused or failed a single write
    #[error("Failed to write '{0}'")]
    Write(String),

    /// Message could not be delivered to an instance
    #[error("Instance '{instance}' rejected '{command}': {message}")]
    Delivery {
        instance: String,
        command: String,
        message: String,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Matched key has no parent segment to derive a device from
    #[error("Key '{0}' has no device segment")]
    KeyWithoutDevice(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Errors from a single notification channel
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Underlying transport failed
    #[error("Channel '{channel}' failed: {source}")]
    Transport {
        channel: String,
        #[source]
        source: StoreError,
    },

    /// Payload could not be encoded
    #[error("Payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
