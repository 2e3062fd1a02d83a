//! # Store Actor
//!
//! This module defines the `StoreActor`, the component that owns one Resource Store's state.
//! It processes messages sequentially, so every transition is applied in a single step and
//! no lock guards the state.

use crate::client::ResourceStore;
use crate::entity::StoreEntity;
use crate::error::StoreError;
use crate::message::{StoreRequest, Started};
use crate::state::{Outcome, StoreState};
use crate::transport::Transport;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The actor that owns a [`StoreState`].
///
/// # Architecture Note
/// This struct is the "Server" half of a Resource Store. It owns the state and the receiver
/// end of the channel; the [`ResourceStore`] handle is the cloneable "Client" half.
///
/// Remote calls happen in the handle's task, between a `Begin` and a `Settle` message, so
/// several operations on the same store can be in flight at once while the state itself is
/// only ever touched here.
///
/// **Publication**: after every transition the actor publishes a clone of the state on a
/// `watch` channel, and only then answers the caller. A caller reading
/// [`ResourceStore::snapshot`] after an awaited operation therefore always sees the
/// post-operation state.
///
/// # Usage Pattern
///
/// ```rust
/// use store_framework::mock::MockTransport;
/// use store_framework::{NoFilters, StoreActor, StoreEntity};
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Clone, Debug, PartialEq, Deserialize)]
/// struct Note { id: u32, text: String }
///
/// impl StoreEntity for Note {
///     type Id = u32;
///     type Create = serde_json::Value;
///     type Update = serde_json::Value;
///     type Filters = NoFilters;
///     const RESOURCE: &'static str = "/notes";
///     const SINGULAR: &'static str = "note";
///     const PLURAL: &'static str = "notes";
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let transport = MockTransport::new();
///     transport
///         .expect(store_framework::Method::Get, "/notes")
///         .return_ok(serde_json::json!({ "records": [{ "id": 1, "text": "hi" }], "total": 1 }));
///
///     // 1. Create
///     let (actor, store) = StoreActor::<Note>::new(10, 10, Arc::new(transport.clone()));
///
///     // 2. Run
///     tokio::spawn(actor.run());
///
///     // 3. Use
///     store.list().await.unwrap();
///     assert_eq!(store.snapshot().total(), 1);
///     transport.verify();
/// }
/// ```
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    state: StoreState<T>,
    publisher: watch::Sender<StoreState<T>>,
}

impl<T: StoreEntity> StoreActor<T> {
    /// Creates a new `StoreActor` and its associated `ResourceStore`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Capacity of the message channel.
    /// * `default_limit` - Page size of a fresh Filter State.
    /// * `transport` - Used by the handle to reach the remote API.
    pub fn new(
        buffer_size: usize,
        default_limit: u32,
        transport: Arc<dyn Transport>,
    ) -> (Self, ResourceStore<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let state = StoreState::new(default_limit);
        let (publisher, observer) = watch::channel(state.clone());
        let actor = Self {
            receiver,
            state,
            publisher,
        };
        let store = ResourceStore::new(sender, observer, transport);
        (actor, store)
    }

    /// Runs the actor's event loop until every handle is dropped.
    pub async fn run(mut self) {
        let resource = T::RESOURCE;
        info!(resource, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Begin {
                    op,
                    filters,
                    respond_to,
                } => {
                    if let Some(update) = filters {
                        self.state.apply_filters(update);
                    }
                    let ticket = self.state.begin(op);
                    debug!(resource, ?op, seq = ticket.seq, in_flight = self.state.in_flight(), "Begin");
                    self.publish();
                    let started = Started {
                        ticket,
                        filters: self.state.filters().clone(),
                    };
                    if respond_to.send(started).is_err() {
                        debug!(resource, seq = ticket.seq, "Caller gone before start");
                        self.state.abandon(ticket);
                        self.publish();
                    }
                }
                StoreRequest::Settle {
                    ticket,
                    result,
                    respond_to,
                } => {
                    let result = self.state.settle(ticket, result);
                    match &result {
                        Ok(outcome) => {
                            info!(resource, op = ?ticket.op, seq = ticket.seq, applied = describe(outcome), total = self.state.total(), "Settled");
                        }
                        Err(StoreError::Superseded) => {
                            warn!(resource, op = ?ticket.op, seq = ticket.seq, "Discarded superseded response");
                        }
                        Err(e) => {
                            warn!(resource, op = ?ticket.op, seq = ticket.seq, error = %e, "Failed");
                        }
                    }
                    self.publish();
                    let _ = respond_to.send(result);
                }
                StoreRequest::Abandon { ticket } => {
                    debug!(resource, op = ?ticket.op, seq = ticket.seq, "Abandoned");
                    self.state.abandon(ticket);
                    self.publish();
                }
                StoreRequest::Reject { error, respond_to } => {
                    warn!(resource, error = %error, "Rejected before sending");
                    self.state.reject(&error);
                    self.publish();
                    let _ = respond_to.send(());
                }
                StoreRequest::SetFilters { update, respond_to } => {
                    let changed = self.state.apply_filters(update);
                    let filters = self.state.filters().clone();
                    debug!(resource, changed, page = filters.page, limit = filters.limit, "Filters set");
                    self.publish();
                    let _ = respond_to.send(filters);
                }
                StoreRequest::ResetFilters { respond_to } => {
                    debug!(resource, "Filters reset");
                    self.state.reset_filters();
                    self.publish();
                    let _ = respond_to.send(());
                }
                StoreRequest::Reset { respond_to } => {
                    info!(resource, "Reset");
                    self.state.reset();
                    self.publish();
                    let _ = respond_to.send(());
                }
            }
        }

        info!(resource, size = self.state.records().len(), "Shutdown");
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

fn describe<T: StoreEntity>(outcome: &Outcome<T>) -> &'static str {
    match outcome {
        Outcome::Listed(_) => "listed",
        Outcome::Fetched(_) => "fetched",
        Outcome::Created(_) => "created",
        Outcome::Updated(_) => "updated",
        Outcome::Removed(_) => "removed",
    }
}
