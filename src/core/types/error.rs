//! Custom error types for the memprobe client core

use std::fmt;
use thiserror::Error;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Invalid value '{value}' for type {value_type}")]
    InvalidValue { value: String, value_type: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("A scan value is required for find mode '{0}'")]
    PatternRequired(String),

    #[error("Session is locked after the first scan; reset before changing {0}")]
    SessionLocked(&'static str),

    #[error("A request is already in flight for this session")]
    SessionBusy,

    #[error("Filtering requires a completed first scan")]
    NoScanResults,

    #[error("Failed to open process {pid}: {reason}")]
    OpenProcessFailed { pid: i32, reason: String },

    #[error("Application info unavailable for process {0}")]
    AppInfoUnavailable(i32),

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to write memory at {address}: {reason}")]
    WriteFailed { address: String, reason: String },

    #[error("Server returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Creates an invalid-value error for the codec
    pub fn invalid_value(value: impl Into<String>, value_type: impl fmt::Display) -> Self {
        ClientError::InvalidValue {
            value: value.into(),
            value_type: value_type.to_string(),
        }
    }

    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        ClientError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a write failed error
    pub fn write_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        ClientError::WriteFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an unexpected-status error
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        ClientError::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// True for errors raised before any request was sent
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidValue { .. }
                | ClientError::InvalidPattern(_)
                | ClientError::PatternRequired(_)
                | ClientError::SessionLocked(_)
                | ClientError::SessionBusy
                | ClientError::NoScanResults
        )
    }
}
