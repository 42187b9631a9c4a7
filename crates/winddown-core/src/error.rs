//! Core error types for winddown-core.
//!
//! Nothing here is fatal to a running session: validation errors block
//! arming the monitor, configuration errors fall back to defaults, and
//! alert errors are swallowed at the dispatch layer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for winddown-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Alert delivery errors
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be prepared
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Validation errors. Reported synchronously at plan-computation time;
/// they block arming a session and change no state.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Alert collaborator errors. Never block the monitor core.
#[derive(Error, Debug)]
pub enum AlertError {
    /// Audio backend missing or blocked
    #[error("Audio backend unavailable: {0}")]
    AudioUnavailable(String),

    /// Notification capability missing or denied
    #[error("Notifications unavailable: {0}")]
    NotificationUnavailable(String),

    /// Delivery attempted but failed
    #[error("Alert delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
