//! Error types for cmdlink
//!
//! Rust-side failures (sink I/O, device images, host client). Wire-level
//! failures are never errors here: the interpreter reports them to the peer
//! as a [`Status`](crate::protocol::Status) line and keeps going.

use thiserror::Error;

use crate::protocol::Status;

/// Result type alias using CmdlinkError
pub type Result<T> = std::result::Result<T, CmdlinkError>;

/// Unified error type for cmdlink operations
#[derive(Debug, Error)]
pub enum CmdlinkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Device Image Errors
    // -------------------------------------------------------------------------
    #[error("Device image corruption detected: {0}")]
    ImageCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The peer sent something that does not follow the line protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The device answered with an `ERROR: 0x..` line
    #[error("Device reported {0}")]
    Device(Status),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for CmdlinkError {
    fn from(e: bincode::Error) -> Self {
        CmdlinkError::Serialization(e.to_string())
    }
}
