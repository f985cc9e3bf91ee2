//! Core error types for focuscycle-core.
//!
//! Terminal transitions on an already-terminal cycle are not errors; the
//! store returns `None` for them.

use std::path::PathBuf;
use thiserror::Error;

use crate::cycle::CycleId;

/// Core error type for focuscycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Intake validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A cycle is already running; only one may be active at a time.
    #[error("Cycle {cycle_id} is still running; interrupt it before starting another")]
    CycleAlreadyActive { cycle_id: CycleId },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Intake validation errors.
///
/// Raised before any state mutation, so they are always recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name is empty (or whitespace only)
    #[error("task is required")]
    EmptyTask,

    /// Minutes outside the accepted range
    #[error("cycle length must be between {min} and {max} minutes, got {value}")]
    MinutesOutOfRange { value: i64, min: u32, max: u32 },
}

impl ValidationError {
    /// Name of the intake field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyTask => "task",
            ValidationError::MinutesOutOfRange { .. } => "minutes",
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
