//! # Store Messages
//!
//! This module defines the messages exchanged between a `ResourceStore` handle and its
//! `StoreActor`.

use crate::entity::StoreEntity;
use crate::error::StoreError;
use crate::filter::{FilterState, FilterUpdate};
use crate::state::{Operation, Outcome, Ticket};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// What the actor hands back when an operation starts.
#[derive(Debug, Clone)]
pub struct Started<F> {
    pub ticket: Ticket,
    /// Filter State at the moment the ticket was issued. List requests are built from it.
    pub filters: FilterState<F>,
}

/// Internal message type sent to the store actor.
///
/// # Two-phase operations
/// Remote calls are not made by the actor. A handle sends `Begin`, performs the call in its
/// own task, and then sends `Settle` with the result. Between the two messages the actor
/// keeps serving other handles, so a slow upload never stalls a list refresh.
///
/// - **Begin**: marks the store loading and issues a [`Ticket`].
/// - **Settle**: applies (or discards, if superseded) the result for a ticket.
/// - **Abandon**: releases a ticket whose caller went away.
/// - **Reject**: records a failure detected before any request was sent.
/// - **SetFilters / ResetFilters / Reset**: synchronous state changes, no remote call.
#[derive(Debug)]
pub enum StoreRequest<T: StoreEntity> {
    Begin {
        op: Operation,
        filters: Option<FilterUpdate<T::Filters>>,
        respond_to: oneshot::Sender<Started<T::Filters>>,
    },
    Settle {
        ticket: Ticket,
        result: Result<Outcome<T>, StoreError>,
        respond_to: Response<Outcome<T>>,
    },
    Abandon {
        ticket: Ticket,
    },
    Reject {
        error: StoreError,
        respond_to: oneshot::Sender<()>,
    },
    SetFilters {
        update: FilterUpdate<T::Filters>,
        respond_to: oneshot::Sender<FilterState<T::Filters>>,
    },
    ResetFilters {
        respond_to: oneshot::Sender<()>,
    },
    Reset {
        respond_to: oneshot::Sender<()>,
    },
}
