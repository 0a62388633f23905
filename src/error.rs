//! Startup error types
//!
//! Request-level failures never surface here: they become HTTP responses.
//! Everything in this enum is fatal to the process.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for server startup operations
pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Config file or environment could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid server address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    /// Served directory missing or unusable
    #[error("Cannot serve directory '{}': {source}", path.display())]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Port in use, permission denied, ...
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Failed to open access log '{path}': {source}")]
    AccessLog {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
