//! # Transport Seam
//!
//! Stores never talk HTTP directly. They build an [`ApiRequest`] and hand it to a
//! [`Transport`], which resolves to the decoded JSON body on 2xx or rejects with a
//! structured [`TransportError`].
//!
//! - [`HttpTransport`](crate::http::HttpTransport) is the production implementation.
//! - [`MockTransport`](crate::mock::MockTransport) and
//!   [`ChannelTransport`](crate::mock::ChannelTransport) are the test doubles.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// HTTP verbs used by the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// A file submitted as `multipart/form-data`, plus any extra text parts.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartUpload {
    pub file_field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartUpload),
}

/// A request against the remote API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, upload: MultipartUpload) -> Self {
        self.body = RequestBody::Multipart(upload);
        self
    }

    /// Looks up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Failure reported by a [`Transport`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("Request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),
    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Human-readable message supplied by the server, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Performs requests against the remote API.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends the request. Resolves to the JSON body (`Value::Null` for an empty body).
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// Shared holder for the bearer credential.
///
/// The session writes it on login/logout; the HTTP transport reads it on every request.
#[derive(Debug, Clone, Default)]
pub struct CredentialSlot(Arc<RwLock<Option<String>>>);

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear(&self) {
        let mut slot = self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
