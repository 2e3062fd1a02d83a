//! # Mock Transports & Testing Guide
//!
//! Stores are tested against in-memory transports instead of a server. Two doubles are
//! provided:
//!
//! | Feature | MockTransport | ChannelTransport |
//! |---------|---------------|------------------|
//! | **Style** | Expectations queued up front | Requests inspected as they arrive |
//! | **Ordering** | Answers in queue order (or later via a `Responder`) | Test answers in any order |
//! | **Use Case** | Operation semantics, error injection | Races, supersession, cancellation |
//!
//! ## Pattern 1: Expectations
//!
//! ```rust
//! use store_framework::mock::MockTransport;
//! use store_framework::{ApiRequest, Method, Transport, TransportError};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = MockTransport::new();
//!     transport.expect(Method::Get, "/orders/O1").return_ok(json!({ "id": "O1" }));
//!     transport.expect(Method::Delete, "/orders/O1").return_err(TransportError::Status {
//!         status: 500,
//!         message: None,
//!     });
//!
//!     let body = transport.send(ApiRequest::get("/orders/O1")).await.unwrap();
//!     assert_eq!(body["id"], "O1");
//!     assert!(transport.send(ApiRequest::delete("/orders/O1")).await.is_err());
//!
//!     transport.verify(); // Ensures all expectations were met
//! }
//! ```
//!
//! ## Pattern 2: Controlling arrival order
//!
//! ```rust
//! use store_framework::mock::{channel_transport, expect_request};
//! use store_framework::{ApiRequest, Method, Transport};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (transport, mut requests) = channel_transport(8);
//!     let call = tokio::spawn(async move { transport.send(ApiRequest::get("/orders")).await });
//!
//!     let pending = expect_request(&mut requests, Method::Get, "/orders").await.unwrap();
//!     pending.respond_ok(json!({ "records": [], "total": 0 }));
//!
//!     assert_eq!(call.await.unwrap().unwrap()["total"], 0);
//! }
//! ```

use crate::transport::{ApiRequest, Method, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, watch};

type Reply = Result<Value, TransportError>;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Answer {
    Ready(Reply),
    Later(oneshot::Receiver<Reply>),
}

/// An expected request and the answer to give it.
struct Expectation {
    method: Method,
    path: String,
    answer: Answer,
}

/// A transport that answers from a queue of expectations.
///
/// Requests must arrive in the order they were expected; an unexpected or mismatched
/// request panics. Clones share the same queue.
#[derive(Clone)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    arrived: Arc<watch::Sender<usize>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        let (arrived, _) = watch::channel(0);
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            arrived: Arc::new(arrived),
        }
    }

    /// Expects a request with the given verb and path.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Waits until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        let mut arrived = self.arrived.subscribe();
        let _ = arrived.wait_for(|seen| *seen >= count).await;
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        let (method, path) = (request.method, request.path.clone());
        {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            self.arrived.send_replace(requests.len());
        }

        let Some(expectation) = expectation else {
            panic!("Unexpected request: {method:?} {path}");
        };
        if expectation.method != method || expectation.path != path {
            panic!(
                "Expectation mismatch: expected {:?} {}, got {method:?} {path}",
                expectation.method, expectation.path
            );
        }

        match expectation.answer {
            Answer::Ready(reply) => reply,
            Answer::Later(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("responder dropped".into()))),
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Answers with a successful body.
    pub fn return_ok(self, body: Value) {
        self.push(Answer::Ready(Ok(body)));
    }

    /// Answers with an error.
    pub fn return_err(self, error: TransportError) {
        self.push(Answer::Ready(Err(error)));
    }

    /// Holds the request open until the returned [`Responder`] answers it.
    pub fn return_later(self) -> Responder {
        let (sender, receiver) = oneshot::channel();
        self.push(Answer::Later(receiver));
        Responder(sender)
    }

    fn push(self, answer: Answer) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            path: self.path,
            answer,
        });
    }
}

/// Answers a request queued with [`ExpectationBuilder::return_later`].
pub struct Responder(oneshot::Sender<Reply>);

impl Responder {
    pub fn respond_ok(self, body: Value) {
        let _ = self.0.send(Ok(body));
    }

    pub fn respond_err(self, error: TransportError) {
        let _ = self.0.send(Err(error));
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// A request waiting for the test to answer it.
#[derive(Debug)]
pub struct PendingRequest {
    pub request: ApiRequest,
    respond_to: oneshot::Sender<Reply>,
}

impl PendingRequest {
    pub fn respond_ok(self, body: Value) {
        let _ = self.respond_to.send(Ok(body));
    }

    pub fn respond_err(self, error: TransportError) {
        let _ = self.respond_to.send(Err(error));
    }
}

/// A transport that forwards every request to a channel the test reads from.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<PendingRequest>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PendingRequest {
                request,
                respond_to,
            })
            .await
            .map_err(|_| TransportError::Network("test harness closed".into()))?;
        response
            .await
            .map_err(|_| TransportError::Network("request dropped by test".into()))?
    }
}

/// Creates a channel transport and the receiver for asserting requests.
///
/// # Testing Strategy
/// The test decides when, and in which order, each request is answered. This is how
/// out-of-order responses are reproduced deterministically.
pub fn channel_transport(buffer_size: usize) -> (ChannelTransport, mpsc::Receiver<PendingRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelTransport { sender }, receiver)
}

/// Helper to verify that the next request has the given verb and path.
pub async fn expect_request(
    receiver: &mut mpsc::Receiver<PendingRequest>,
    method: Method,
    path: &str,
) -> Option<PendingRequest> {
    match receiver.recv().await {
        Some(pending) if pending.request.method == method && pending.request.path == path => {
            Some(pending)
        }
        _ => None,
    }
}
