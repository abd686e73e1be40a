//! Error types for LineKV
//!
//! Provides a unified error type for all operations.

use std::io::ErrorKind;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for LineKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// Stable label for this failure, as reported in `ERR server error: <kind>`
    ///
    /// Labels are part of the wire contract and must not change.
    pub fn kind(&self) -> &'static str {
        match self {
            KvError::Io(e) => io_kind_label(e.kind()),
            // serde_json wraps write failures; label them like plain I/O
            KvError::Serialization(e) => match e.io_error_kind() {
                Some(kind) => io_kind_label(kind),
                None => "ValueError",
            },
            KvError::Protocol(_) => "ProtocolError",
            KvError::Config(_) => "ConfigError",
        }
    }
}

fn io_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "FileNotFoundError",
        ErrorKind::PermissionDenied => "PermissionError",
        ErrorKind::AlreadyExists => "FileExistsError",
        ErrorKind::IsADirectory => "IsADirectoryError",
        ErrorKind::NotADirectory => "NotADirectoryError",
        ErrorKind::Interrupted => "InterruptedError",
        ErrorKind::TimedOut | ErrorKind::WouldBlock => "TimeoutError",
        ErrorKind::BrokenPipe => "BrokenPipeError",
        ErrorKind::ConnectionReset => "ConnectionResetError",
        ErrorKind::ConnectionAborted => "ConnectionAbortedError",
        ErrorKind::ConnectionRefused => "ConnectionRefusedError",
        _ => "OSError",
    }
}
