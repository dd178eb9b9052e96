//! Error types for gatewire
//!
//! Provides a unified error type for all operations. None of these are
//! retried: any error ends the loop that hit it and, because both loops share
//! one session, the whole exchange.

use std::io;

use thiserror::Error;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for gatewire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    /// The transport could not be established or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// A read or an acknowledgment wait exceeded its window
    #[error("Timed out: {0}")]
    Timeout(String),

    // -------------------------------------------------------------------------
    // Frame Errors
    // -------------------------------------------------------------------------
    /// A decoded record (or the frame around it) is structurally inconsistent
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The inflater rejected the compressed input
    #[error("Compression error: {0}")]
    Compression(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Other
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A producer or consumer thread panicked
    #[error("Loop panicked: {0}")]
    Panicked(String),
}

impl WireError {
    /// Classify an I/O error raised while moving frame bytes
    ///
    /// - `TimedOut` / `WouldBlock` → `Timeout` (unix sockets report an elapsed
    ///   read timeout as `WouldBlock`, Windows as `TimedOut`)
    /// - `InvalidData` → `Compression` (raised by the inflater)
    /// - `UnexpectedEof` → `MalformedEnvelope` (block ended mid-record)
    /// - reset / aborted / broken pipe → `Connection`
    pub fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                WireError::Timeout(err.to_string())
            }
            io::ErrorKind::InvalidData => WireError::Compression(err.to_string()),
            io::ErrorKind::UnexpectedEof => {
                WireError::MalformedEnvelope(format!("truncated frame: {}", err))
            }
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected => WireError::Connection(err.to_string()),
            _ => WireError::Io(err),
        }
    }

    /// Short name of the error kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            WireError::Connection(_) => "connection",
            WireError::Timeout(_) => "timeout",
            WireError::MalformedEnvelope(_) => "malformed_envelope",
            WireError::Compression(_) => "compression",
            WireError::Config(_) => "config",
            WireError::Io(_) => "io",
            WireError::Panicked(_) => "panicked",
        }
    }
}
