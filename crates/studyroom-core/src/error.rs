//! Core error types for studyroom-core.
//!
//! This module defines the error hierarchy using thiserror. Every mutation on
//! [`AppState`](crate::AppState) either succeeds or returns one of these
//! without touching the in-memory snapshot.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed or out-of-range user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A manual weight would push the course past 100%
    #[error("Weight of {requested}% exceeds the {available}% still available")]
    WeightExceeded { requested: f64, available: f64 },

    /// A grade boundary edit would break the partition of [0, 100]
    #[error("Invalid grade boundaries: {0}")]
    InvalidBoundary(#[from] BoundaryError),

    /// Unknown course, evaluation or session id
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field left blank
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    /// Percentage outside [0, 100] or not a number
    #[error("'{field}' must be a percentage between 0 and 100 (got {value})")]
    PercentageOutOfRange { field: &'static str, value: f64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Grade boundary table errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// Index does not address a band
    #[error("Band index {index} out of bounds (table has {len} bands)")]
    OutOfBounds { index: usize, len: usize },

    /// The table would end up with no bands
    #[error("A grade table needs at least one band")]
    Empty,

    /// New threshold is not strictly between its neighbours
    #[error("Minimum {value} for '{letter}' must be below {upper} and above {lower}")]
    ThresholdOrder {
        letter: String,
        value: u8,
        upper: u8,
        lower: u8,
    },

    /// The lowest band always starts at 0
    #[error("The lowest band '{letter}' must start at 0 (got {value})")]
    LowestBandMin { letter: String, value: u8 },

    /// Neighbour thresholds are adjacent, nothing fits between them
    #[error("No room to insert a band between minimums {upper} and {lower}")]
    NoRoom { upper: u8, lower: u8 },

    /// Partition invariant broken (gap, overlap or inverted range)
    #[error("Band '{letter}' covers {min}-{max}: {message}")]
    Partition {
        letter: String,
        min: u8,
        max: u8,
        message: String,
    },

    /// Letter or GPA malformed
    #[error("Band '{letter}': {message}")]
    InvalidBand { letter: String, message: String },
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Stored payload could not be (de)serialized
    #[error("Malformed payload for '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Payload written by a newer version of studyroom
    #[error("Payload for '{key}' has version {found}, this build supports up to {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },

    /// Filesystem errors (data directory, database file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
