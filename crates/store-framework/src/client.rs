//! # Resource Store Handle
//!
//! This module defines the cloneable handle views use to drive a store.

use crate::entity::StoreEntity;
use crate::error::StoreError;
use crate::filter::{FilterState, FilterUpdate};
use crate::message::{Started, StoreRequest};
use crate::state::{Operation, Outcome, Page, StoreState, Ticket};
use crate::transport::{ApiRequest, Method, Transport, TransportError};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument, warn};

/// A type-safe handle for a [`StoreActor`](crate::StoreActor).
///
/// ## ResourceStore
///
/// `ResourceStore<T>` runs the operations of the generic Resource Store. Every remote
/// operation follows the same three steps:
///
/// 1. `Begin`: the actor marks the store loading and issues a ticket.
/// 2. The request is sent through the [`Transport`] from the caller's task.
/// 3. `Settle`: the actor applies the result, or discards it if it was superseded.
///
/// * **Cloneable**: holds a sender, a watch receiver and the transport.
/// * **Observable**: [`snapshot`](Self::snapshot) and [`subscribe`](Self::subscribe)
///   expose the published state.
/// * **Cancellation-safe**: dropping an operation future releases its ticket, so loading
///   never stays stuck.
pub struct ResourceStore<T: StoreEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
    observer: watch::Receiver<StoreState<T>>,
    transport: Arc<dyn Transport>,
}

impl<T: StoreEntity> Clone for ResourceStore<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            observer: self.observer.clone(),
            transport: self.transport.clone(),
        }
    }
}

impl<T: StoreEntity> ResourceStore<T> {
    pub fn new(
        sender: mpsc::Sender<StoreRequest<T>>,
        observer: watch::Receiver<StoreState<T>>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            sender,
            observer,
            transport,
        }
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> StoreState<T> {
        self.observer.borrow().clone()
    }

    /// A receiver that is notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.observer.clone()
    }

    /// Lists with the stored Filter State, replacing the Collection Snapshot on success.
    #[instrument(skip_all, fields(resource = T::RESOURCE))]
    pub async fn list(&self) -> Result<Page<T>, StoreError> {
        self.run_list(None).await
    }

    /// Applies `update` to the Filter State, then lists.
    #[instrument(skip_all, fields(resource = T::RESOURCE))]
    pub async fn list_with(&self, update: FilterUpdate<T::Filters>) -> Result<Page<T>, StoreError> {
        self.run_list(Some(update)).await
    }

    /// Fetches one record and makes it the Selected Record.
    ///
    /// A 404 or a `null` body is reported as [`StoreError::NotFound`] and clears the
    /// selection.
    #[instrument(skip_all, fields(resource = T::RESOURCE, id = %id))]
    pub async fn get_by_id(&self, id: &T::Id) -> Result<T, StoreError> {
        let fallback = Operation::Fetch.fallback_message::<T>();
        let (_, guard) = self.begin(Operation::Fetch, None).await?;

        let result = match self.transport.send(ApiRequest::get(T::record_path(id))).await {
            Ok(Value::Null) => Err(StoreError::NotFound(not_found::<T>(id))),
            Ok(body) => decode_record(body, fallback).map(Outcome::Fetched),
            Err(e) if e.is_not_found() => Err(StoreError::NotFound(
                e.message()
                    .map(str::to_owned)
                    .unwrap_or_else(|| not_found::<T>(id)),
            )),
            Err(e) => Err(transport_failure(e, fallback)),
        };

        match self.settle(guard, result).await? {
            Outcome::Fetched(record) => Ok(record),
            _ => Err(StoreError::UnexpectedOutcome("get_by_id")),
        }
    }

    /// Submits a draft and appends the server's record to the Collection Snapshot.
    #[instrument(skip_all, fields(resource = T::RESOURCE))]
    pub async fn create(&self, draft: T::Create) -> Result<T, StoreError> {
        if let Err(message) = T::validate_create(&draft) {
            return Err(self.reject(StoreError::Validation(message)).await);
        }
        let body = match serde_json::to_value(&draft) {
            Ok(body) => body,
            Err(e) => return Err(self.reject(StoreError::Validation(e.to_string())).await),
        };
        debug!(?draft, "Create");
        self.append(Operation::Create, ApiRequest::post(T::RESOURCE).json(body))
            .await
    }

    /// Sends a multipart (or any other) request whose response is a new record, and
    /// appends it like [`create`](Self::create).
    #[instrument(skip_all, fields(resource = T::RESOURCE, path = %request.path))]
    pub async fn upload(&self, request: ApiRequest) -> Result<T, StoreError> {
        self.append(Operation::Upload, request).await
    }

    /// Submits a change set with the entity's update verb.
    #[instrument(skip_all, fields(resource = T::RESOURCE, id = %id))]
    pub async fn update(&self, id: &T::Id, changes: T::Update) -> Result<T, StoreError> {
        self.send_changes(
            T::UPDATE_METHOD,
            id,
            changes,
            Operation::Update.fallback_message::<T>(),
        )
        .await
    }

    /// Submits a partial change set with `PATCH`.
    #[instrument(skip_all, fields(resource = T::RESOURCE, id = %id))]
    pub async fn patch(&self, id: &T::Id, changes: T::Update) -> Result<T, StoreError> {
        self.send_changes(
            Method::Patch,
            id,
            changes,
            Operation::Update.fallback_message::<T>(),
        )
        .await
    }

    /// Like [`patch`](Self::patch), reporting `fallback` when the server gives no message.
    #[instrument(skip_all, fields(resource = T::RESOURCE, id = %id))]
    pub async fn patch_with_fallback(
        &self,
        id: &T::Id,
        changes: T::Update,
        fallback: &str,
    ) -> Result<T, StoreError> {
        self.send_changes(Method::Patch, id, changes, fallback.to_owned())
            .await
    }

    /// Deletes a record. The Collection Snapshot only changes on success.
    #[instrument(skip_all, fields(resource = T::RESOURCE, id = %id))]
    pub async fn remove(&self, id: &T::Id) -> Result<(), StoreError> {
        let removed = id.clone();
        let request = ApiRequest::delete(T::record_path(id));
        match self
            .execute(Operation::Remove, None, |_| request, |_| Ok(Outcome::Removed(removed)))
            .await?
        {
            Outcome::Removed(_) => Ok(()),
            _ => Err(StoreError::UnexpectedOutcome("remove")),
        }
    }

    /// Merges a partial Filter State. Never triggers a fetch.
    pub async fn set_filters(
        &self,
        update: FilterUpdate<T::Filters>,
    ) -> Result<FilterState<T::Filters>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::SetFilters { update, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)
    }

    /// Restores the default Filter State.
    pub async fn reset_filters(&self) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::ResetFilters { respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)
    }

    /// Drops every cached record, the selection, the filters and the error.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Reset { respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)
    }

    async fn run_list(&self, update: Option<FilterUpdate<T::Filters>>) -> Result<Page<T>, StoreError> {
        let outcome = self
            .execute(
                Operation::List,
                update,
                |filters| ApiRequest::get(T::RESOURCE).with_query(filters.query()),
                |body| parse_page::<T>(body).map(Outcome::Listed),
            )
            .await?;
        match outcome {
            Outcome::Listed(page) => Ok(page),
            _ => Err(StoreError::UnexpectedOutcome("list")),
        }
    }

    async fn append(&self, op: Operation, request: ApiRequest) -> Result<T, StoreError> {
        let fallback = op.fallback_message::<T>();
        match self
            .execute(op, None, |_| request, |body| {
                decode_record(body, fallback).map(Outcome::Created)
            })
            .await?
        {
            Outcome::Created(record) => Ok(record),
            _ => Err(StoreError::UnexpectedOutcome("create")),
        }
    }

    async fn send_changes(
        &self,
        method: Method,
        id: &T::Id,
        changes: T::Update,
        fallback: String,
    ) -> Result<T, StoreError> {
        let body = match serde_json::to_value(&changes) {
            Ok(body) => body,
            Err(e) => return Err(self.reject(StoreError::Validation(e.to_string())).await),
        };
        if body.as_object().is_some_and(|fields| fields.is_empty()) {
            return Err(self
                .reject(StoreError::Validation("No changes to submit".into()))
                .await);
        }
        debug!(?changes, ?method, "Update");
        let request = ApiRequest::new(method, T::record_path(id)).json(body);
        match self
            .execute_with_fallback(Operation::Update, None, fallback.clone(), |_| request, |body| {
                decode_record(body, fallback).map(Outcome::Updated)
            })
            .await?
        {
            Outcome::Updated(record) => Ok(record),
            _ => Err(StoreError::UnexpectedOutcome("update")),
        }
    }

    async fn execute<B, D>(
        &self,
        op: Operation,
        filters: Option<FilterUpdate<T::Filters>>,
        build: B,
        decode: D,
    ) -> Result<Outcome<T>, StoreError>
    where
        B: FnOnce(&FilterState<T::Filters>) -> ApiRequest,
        D: FnOnce(Value) -> Result<Outcome<T>, StoreError>,
    {
        self.execute_with_fallback(op, filters, op.fallback_message::<T>(), build, decode)
            .await
    }

    /// Begin, send, settle.
    async fn execute_with_fallback<B, D>(
        &self,
        op: Operation,
        filters: Option<FilterUpdate<T::Filters>>,
        fallback: String,
        build: B,
        decode: D,
    ) -> Result<Outcome<T>, StoreError>
    where
        B: FnOnce(&FilterState<T::Filters>) -> ApiRequest,
        D: FnOnce(Value) -> Result<Outcome<T>, StoreError>,
    {
        let (started, guard) = self.begin(op, filters).await?;
        let request = build(&started.filters);
        debug!(?op, seq = started.ticket.seq, path = %request.path, "Sending request");

        let result = match self.transport.send(request).await {
            Ok(body) => decode(body),
            Err(e) => Err(transport_failure(e, fallback)),
        };

        self.settle(guard, result).await
    }

    async fn begin(
        &self,
        op: Operation,
        filters: Option<FilterUpdate<T::Filters>>,
    ) -> Result<(Started<T::Filters>, TicketGuard<T>), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Begin {
                op,
                filters,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        let mut pending = PendingStart {
            response,
            sender: Some(self.sender.clone()),
        };
        let started = (&mut pending.response)
            .await
            .map_err(|_| StoreError::StoreDropped)?;
        pending.sender = None;
        let guard = TicketGuard {
            sender: Some(self.sender.clone()),
            ticket: started.ticket,
        };
        Ok((started, guard))
    }

    async fn settle(
        &self,
        mut guard: TicketGuard<T>,
        result: Result<Outcome<T>, StoreError>,
    ) -> Result<Outcome<T>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Settle {
                ticket: guard.ticket,
                result,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        guard.disarm();
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Records a failure detected before any request was sent and hands the error back.
    pub async fn reject(&self, error: StoreError) -> StoreError {
        let (respond_to, response) = oneshot::channel();
        if self
            .sender
            .send(StoreRequest::Reject {
                error: error.clone(),
                respond_to,
            })
            .await
            .is_err()
        {
            return StoreError::StoreClosed;
        }
        let _ = response.await;
        error
    }
}

/// Releases a ticket if the operation is dropped before it settles.
struct TicketGuard<T: StoreEntity> {
    sender: Option<mpsc::Sender<StoreRequest<T>>>,
    ticket: Ticket,
}

impl<T: StoreEntity> TicketGuard<T> {
    fn disarm(&mut self) {
        self.sender = None;
    }
}

impl<T: StoreEntity> Drop for TicketGuard<T> {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            release(sender, self.ticket);
        }
    }
}

/// Waits for the actor to issue a ticket. If dropped while waiting, a ticket the actor
/// already issued is released.
struct PendingStart<T: StoreEntity> {
    response: oneshot::Receiver<Started<T::Filters>>,
    sender: Option<mpsc::Sender<StoreRequest<T>>>,
}

impl<T: StoreEntity> Drop for PendingStart<T> {
    fn drop(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };
        self.response.close();
        if let Ok(started) = self.response.try_recv() {
            release(sender, started.ticket);
        }
    }
}

fn release<T: StoreEntity>(sender: mpsc::Sender<StoreRequest<T>>, ticket: Ticket) {
    if let Err(mpsc::error::TrySendError::Full(msg)) =
        sender.try_send(StoreRequest::Abandon { ticket })
    {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = sender.send(msg).await;
            });
        }
    }
}

/// Decodes a list body into a page. Both the records array and a numeric `total` are
/// required; anything less is rejected as a whole.
pub(crate) fn parse_page<T: StoreEntity>(body: Value) -> Result<Page<T>, StoreError> {
    let fallback = || StoreError::Transport {
        message: Operation::List.fallback_message::<T>(),
        status: None,
    };
    let Value::Object(mut fields) = body else {
        warn!(resource = T::RESOURCE, "List response is not an object");
        return Err(fallback());
    };
    let Some(total) = fields.get("total").and_then(Value::as_u64) else {
        warn!(resource = T::RESOURCE, "List response has no numeric total");
        return Err(fallback());
    };
    let records = match fields.remove(T::LIST_FIELD) {
        Some(records @ Value::Array(_)) => records,
        _ => {
            warn!(resource = T::RESOURCE, field = T::LIST_FIELD, "List response has no records array");
            return Err(fallback());
        }
    };
    let records: Vec<T> = serde_json::from_value(records).map_err(|e| {
        warn!(resource = T::RESOURCE, error = %e, "List records do not decode");
        fallback()
    })?;
    Ok(Page { records, total })
}

fn decode_record<T: StoreEntity>(body: Value, fallback: String) -> Result<T, StoreError> {
    serde_json::from_value(body).map_err(|e| {
        warn!(resource = T::RESOURCE, error = %e, "Record does not decode");
        StoreError::Transport {
            message: fallback,
            status: None,
        }
    })
}

fn transport_failure(error: TransportError, fallback: String) -> StoreError {
    if let TransportError::Decode(detail) = &error {
        warn!(%detail, "Undecodable response");
    }
    StoreError::from_transport(error, fallback)
}

fn not_found<T: StoreEntity>(id: &T::Id) -> String {
    format!("{} {} not found", T::SINGULAR, id)
}
