use store_framework::{StoreError, TransportError};
use thiserror::Error;

/// Errors raised by the console outside of a single store operation.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Login rejected, or a session call made without credentials.
    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}
