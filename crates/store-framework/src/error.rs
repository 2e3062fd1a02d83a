//! # Store Errors
//!
//! This module defines the error types shared by every Resource Store. Operations return
//! [`StoreError`]; the store's error field holds the flattened [`StoreFailure`] that views
//! render.

use crate::transport::TransportError;

/// Errors that can occur while running a store operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The remote call failed. `message` is the server's message, or the operation's
    /// fallback when the server did not provide one.
    #[error("{message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },
    /// A detail fetch completed but the record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The request was malformed and never left the process.
    #[error("{0}")]
    Validation(String),
    /// A newer request for the same data was issued before this one settled.
    #[error("Response superseded by a newer request")]
    Superseded,
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Unexpected outcome for {0}")]
    UnexpectedOutcome(&'static str),
}

impl StoreError {
    /// Converts a transport failure, preferring the server-provided message.
    pub fn from_transport(error: TransportError, fallback: impl Into<String>) -> Self {
        let status = error.status();
        let message = error
            .message()
            .map(str::to_owned)
            .unwrap_or_else(|| fallback.into());
        StoreError::Transport { message, status }
    }

    /// Classifies the error for the store's error field.
    ///
    /// Returns `None` for errors that never reach the error field (supersession and
    /// channel failures).
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            StoreError::Transport { .. } | StoreError::UnexpectedOutcome(_) => {
                Some(FailureKind::Transport)
            }
            StoreError::NotFound(_) => Some(FailureKind::NotFound),
            StoreError::Validation(_) => Some(FailureKind::Validation),
            StoreError::Superseded | StoreError::StoreClosed | StoreError::StoreDropped => None,
        }
    }
}

/// Category of a failure recorded in the store's error field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or server error. Worth retrying.
    Transport,
    /// The remote answered, and the record is not there. Retrying will not help.
    NotFound,
    /// Rejected before any request was sent.
    Validation,
}

/// The last error of a store, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl StoreFailure {
    pub fn from_error(error: &StoreError) -> Option<Self> {
        error.failure_kind().map(|kind| Self {
            kind,
            message: error.to_string(),
        })
    }

    pub fn is_retryable(&self) -> bool {
        self.kind == FailureKind::Transport
    }
}
