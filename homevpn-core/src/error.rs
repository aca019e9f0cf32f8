//! Error types for the HomeVPN core
//!
//! Internal layers return these through `Result`. The status engine turns
//! every failure into activity-log text or `Status::last_error` instead of
//! propagating it, so only construction and the CLI ever see them directly.

use thiserror::Error;

/// Main error type for the HomeVPN core
#[derive(Error, Debug)]
pub enum HomeVpnError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to running external commands
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Errors related to the external IP probe
    #[error("IP probe error: {0}")]
    Probe(#[from] ProbeError),

    /// An operation was refused or could not complete
    #[error("Operation rejected: {0}")]
    Rejected(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HOME environment variable not set")]
    NoHomeDirectory,

    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Invalid {key} value: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },
}

/// External command errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Failed to execute command `{command}`: {reason}")]
    SpawnFailed { command: String, reason: String },
}

/// External IP probe errors
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("HTTP client creation failed: {0}")]
    ClientCreationFailed(#[from] reqwest::Error),
}
