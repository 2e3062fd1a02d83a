//! # Store Framework
//!
//! This crate provides the building blocks for keeping a local, observable copy of remote
//! resources coherent with a JSON API. It implements a **reactive resource-store** pattern
//! on top of the **Actor Model**: each resource type gets one store that owns its cached
//! list, its selected record, its filter state and its request status.
//!
//! ## Why a store per resource?
//!
//! - **Uniform operations**: `list`, `get_by_id`, `create`, `update`, `remove` and
//!   `set_filters` behave the same for users, orders, services, …
//! - **Consistent request state**: every operation marks the store loading, clears the
//!   previous error, and always settles, success or failure.
//! - **Coherent cache**: writes patch the cached list and the selected record in place,
//!   without a refetch.
//! - **Last-write-wins**: a list response that was overtaken by a newer list is discarded.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`StoreEntity`]) - record shape, endpoint, draft/change-set/filter types
//! 2. **State Layer** ([`StoreState`]) - pure transitions, supersession bookkeeping
//! 3. **Runtime Layer** ([`StoreActor`]) - sequential owner of the state, publishes snapshots
//! 4. **Interface Layer** ([`ResourceStore`], [`EntityStore`]) - async operations for views
//! 5. **Transport Layer** ([`Transport`], [`HttpTransport`]) - the remote API
//!
//! ```rust
//! use store_framework::mock::MockTransport;
//! use store_framework::{query_filters, FilterUpdate, Method, StoreActor, StoreEntity};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! query_filters! {
//!     pub struct TaskFilters {
//!         status: String => "status",
//!     }
//! }
//!
//! #[derive(Clone, Debug, PartialEq, Deserialize)]
//! struct Task { id: String, status: String }
//!
//! #[derive(Debug, Serialize)]
//! struct TaskChanges { status: String }
//!
//! impl StoreEntity for Task {
//!     type Id = String;
//!     type Create = serde_json::Value;
//!     type Update = TaskChanges;
//!     type Filters = TaskFilters;
//!     const RESOURCE: &'static str = "/tasks";
//!     const SINGULAR: &'static str = "task";
//!     const PLURAL: &'static str = "tasks";
//!     fn id(&self) -> &String { &self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = MockTransport::new();
//!     transport.expect(Method::Get, "/tasks").return_ok(json!({
//!         "records": [{ "id": "T1", "status": "open" }],
//!         "total": 1
//!     }));
//!     transport.expect(Method::Put, "/tasks/T1").return_ok(json!({ "id": "T1", "status": "done" }));
//!
//!     let (actor, store) = StoreActor::<Task>::new(16, 10, Arc::new(transport.clone()));
//!     tokio::spawn(actor.run());
//!
//!     store
//!         .list_with(FilterUpdate::filters(TaskFiltersPatch {
//!             status: Some("open".into()),
//!         }))
//!         .await
//!         .unwrap();
//!     store.update(&"T1".to_string(), TaskChanges { status: "done".into() }).await.unwrap();
//!
//!     let snapshot = store.snapshot();
//!     assert_eq!(snapshot.records()[0].status, "done");
//!     assert_eq!(snapshot.total(), 1);
//!     assert!(!snapshot.is_loading());
//!     transport.verify();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store runs in its own Tokio task and applies transitions **sequentially**
//! - Remote calls run in the caller's task, so several operations can be in flight at once
//! - Observers read published clones (`watch`), never the live state
//! - No locks around store state
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockTransport` (queued expectations) and
//! `channel_transport` (the test answers each request when it chooses).

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod filter;
pub mod http;
pub mod message;
pub mod mock;
pub mod state;
pub mod store_trait;
pub mod transport;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use client::ResourceStore;
pub use entity::StoreEntity;
pub use error::{FailureKind, StoreError, StoreFailure};
pub use filter::{FilterState, FilterUpdate, FilterValue, NoFilters, QueryFilters, DEFAULT_PAGE_SIZE};
pub use http::HttpTransport;
pub use message::{Response, Started, StoreRequest};
pub use state::{Operation, Outcome, Page, StoreState, Ticket};
pub use store_trait::EntityStore;
pub use transport::{
    ApiRequest, CredentialSlot, Method, MultipartUpload, RequestBody, Transport, TransportError,
};

#[doc(hidden)]
pub mod __private {
    pub use paste::paste;
}
