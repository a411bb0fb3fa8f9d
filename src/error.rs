//! Error handling for loudbench
//!
//! One error enum for the whole harness. Adapter failures carry the meter
//! name so a table row can be traced back to the tool that produced it.

use thiserror::Error;

/// Result type alias for loudbench operations
pub type Result<T> = std::result::Result<T, LoudbenchError>;

/// Main error type for loudbench operations
#[derive(Error, Debug)]
pub enum LoudbenchError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid input: '{input}' is neither a file nor a directory")]
    InvalidInput { input: String },

    // Signal generation errors
    #[error("Invalid signal parameters: {reason}")]
    InvalidSignal { reason: String },

    // Benchmark configuration errors
    #[error("Invalid benchmark configuration: {reason}")]
    InvalidConfig { reason: String },

    // Meter errors
    #[error("Meter '{meter}' is not available: {reason}")]
    MeterUnavailable { meter: String, reason: String },

    #[error("Unknown meter name: '{name}'")]
    UnknownMeter { name: String },

    #[error("Meter '{meter}' failed: {reason}")]
    MeterFailed { meter: String, reason: String },

    #[error("Could not parse output of '{meter}': {reason}")]
    ParseFailure { meter: String, reason: String },

    #[error("Subprocess '{command}' exited with {status}")]
    SubprocessFailed { command: String, status: String },

    // Plot errors
    #[error("Plot rendering failed: {reason}")]
    Plot { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LoudbenchError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            LoudbenchError::FileNotFound { .. } => "FILE_NOT_FOUND",
            LoudbenchError::InvalidAudio { .. } => "INVALID_AUDIO",
            LoudbenchError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            LoudbenchError::InvalidInput { .. } => "INVALID_INPUT",
            LoudbenchError::InvalidSignal { .. } => "INVALID_SIGNAL",
            LoudbenchError::InvalidConfig { .. } => "INVALID_CONFIG",
            LoudbenchError::MeterUnavailable { .. } => "METER_UNAVAILABLE",
            LoudbenchError::UnknownMeter { .. } => "UNKNOWN_METER",
            LoudbenchError::MeterFailed { .. } => "METER_FAILED",
            LoudbenchError::ParseFailure { .. } => "PARSE_FAILURE",
            LoudbenchError::SubprocessFailed { .. } => "SUBPROCESS_FAILED",
            LoudbenchError::Plot { .. } => "PLOT_ERROR",
            LoudbenchError::Io(_) => "IO_ERROR",
            LoudbenchError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
