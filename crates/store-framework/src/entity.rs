//! # StoreEntity Trait
//!
//! The `StoreEntity` trait is the contract every record type (user, order, service, …)
//! implements to be cached by the generic [`StoreActor`](crate::StoreActor). It names the
//! identity key, the draft and change-set payloads, the filter set, and the remote endpoint.
//! Everything else (request lifecycle, supersession, cache patching) is written once in the
//! framework.
//!
//! # Architecture Note
//! We use associated types so that an `Order` store only accepts an `OrderCreate` draft and
//! `OrderFilters`; sending a `ServiceCreate` to it does not compile.

use crate::filter::QueryFilters;
use crate::transport::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by a Resource Store.
pub trait StoreEntity:
    Clone + Debug + PartialEq + DeserializeOwned + Send + Sync + 'static
{
    /// The identity key. Assigned by the remote system, immutable after creation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Draft submitted on create.
    type Create: Serialize + Send + Sync + Debug;

    /// Partial change set submitted on update. Unset fields must be skipped on
    /// serialization.
    type Update: Serialize + Send + Sync + Debug;

    /// Filter fields accepted by the list endpoint.
    type Filters: QueryFilters;

    /// Base path of the resource, e.g. `/orders`.
    const RESOURCE: &'static str;

    /// Singular noun for messages, e.g. `order`.
    const SINGULAR: &'static str;

    /// Plural noun for messages, e.g. `orders`.
    const PLURAL: &'static str;

    /// Field of the list response holding the records.
    const LIST_FIELD: &'static str = "records";

    /// Verb used by [`ResourceStore::update`](crate::ResourceStore::update).
    const UPDATE_METHOD: Method = Method::Put;

    fn id(&self) -> &Self::Id;

    /// Structural check of a draft before it is sent.
    fn validate_create(_draft: &Self::Create) -> Result<(), String> {
        Ok(())
    }

    /// Path of a single record.
    fn record_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::RESOURCE, id)
    }
}
