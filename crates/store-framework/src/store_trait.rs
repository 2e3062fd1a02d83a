//! # EntityStore Trait
//!
//! Provides a common interface for per-entity store wrappers, adding the generic query and
//! housekeeping operations on top of a [`ResourceStore`].
use crate::{FilterState, FilterUpdate, Page, ResourceStore, StoreEntity, StoreError, StoreState};
use async_trait::async_trait;

/// Trait for per-entity wrappers to inherit the generic Resource Store operations.
///
/// A wrapper only names its inner store; `list`, `get_by_id`, `remove`, the filter calls and
/// `reset` come for free. Entity-specific operations (status transitions, uploads, …) are
/// written as inherent methods on the wrapper.
///
/// # Example
///
/// ```rust
/// use store_framework::{EntityStore, NoFilters, ResourceStore, StoreEntity};
/// use serde::Deserialize;
///
/// #[derive(Clone, Debug, PartialEq, Deserialize)]
/// struct Invoice { id: String }
///
/// impl StoreEntity for Invoice {
///     type Id = String;
///     type Create = serde_json::Value;
///     type Update = serde_json::Value;
///     type Filters = NoFilters;
///     const RESOURCE: &'static str = "/invoices";
///     const SINGULAR: &'static str = "invoice";
///     const PLURAL: &'static str = "invoices";
///     fn id(&self) -> &String { &self.id }
/// }
///
/// struct InvoiceClient {
///     inner: ResourceStore<Invoice>,
/// }
///
/// impl EntityStore<Invoice> for InvoiceClient {
///     fn inner(&self) -> &ResourceStore<Invoice> {
///         &self.inner
///     }
/// }
///
/// async fn usage(client: InvoiceClient) {
///     // list() and remove() are provided automatically!
///     let _ = client.list().await;
///     let _ = client.remove(&"INV-1".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait EntityStore<T: StoreEntity>: Send + Sync {
    /// Access the inner generic ResourceStore.
    fn inner(&self) -> &ResourceStore<T>;

    /// The most recently published state.
    fn snapshot(&self) -> StoreState<T> {
        self.inner().snapshot()
    }

    /// Refresh the Collection Snapshot with the stored Filter State.
    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE))]
    async fn list(&self) -> Result<Page<T>, StoreError> {
        tracing::debug!("Sending request");
        self.inner().list().await
    }

    /// Fetch a record into the Selected Record.
    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE))]
    async fn get_by_id(&self, id: &T::Id) -> Result<T, StoreError> {
        tracing::debug!("Sending request");
        self.inner().get_by_id(id).await
    }

    /// Delete a record by ID.
    #[tracing::instrument(skip(self), fields(resource = T::RESOURCE))]
    async fn remove(&self, id: &T::Id) -> Result<(), StoreError> {
        tracing::debug!("Sending request");
        self.inner().remove(id).await
    }

    async fn set_filters(
        &self,
        update: FilterUpdate<T::Filters>,
    ) -> Result<FilterState<T::Filters>, StoreError> {
        self.inner().set_filters(update).await
    }

    async fn reset_filters(&self) -> Result<(), StoreError> {
        self.inner().reset_filters().await
    }

    async fn reset(&self) -> Result<(), StoreError> {
        self.inner().reset().await
    }
}
