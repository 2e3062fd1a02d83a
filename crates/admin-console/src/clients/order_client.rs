//! # Order Client
//!
//! High-level API over the Order store. Status and partner changes are partial updates
//! sent with `PATCH`; the response is still the full canonical order and replaces the
//! cached copy.
use crate::model::{Order, OrderCreate, OrderStatus, OrderUpdate};
use store_framework::{EntityStore, ResourceStore, StoreError};
use tracing::{debug, instrument};

/// Client for the Order store.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceStore<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceStore<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, draft: OrderCreate) -> Result<Order, StoreError> {
        debug!("Sending request");
        self.inner.create(draft).await
    }

    #[instrument(skip(self))]
    pub async fn update_order(&self, id: &str, changes: OrderUpdate) -> Result<Order, StoreError> {
        debug!("Sending request");
        self.inner.update(&id.to_owned(), changes).await
    }

    /// Moves an order to `status`. Only the status field is sent.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, StoreError> {
        debug!("Sending request");
        let changes = OrderUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.inner.patch(&id.to_owned(), changes).await
    }

    #[instrument(skip(self))]
    pub async fn assign_partner(&self, id: &str, partner_id: &str) -> Result<Order, StoreError> {
        debug!("Sending request");
        let changes = OrderUpdate {
            partner_assigned: Some(Some(partner_id.to_owned())),
            ..Default::default()
        };
        self.inner.patch(&id.to_owned(), changes).await
    }

    /// Removes the partner from an order by sending `partnerAssigned: null`.
    #[instrument(skip(self))]
    pub async fn unassign_partner(&self, id: &str) -> Result<Order, StoreError> {
        debug!("Sending request");
        let changes = OrderUpdate {
            partner_assigned: Some(None),
            ..Default::default()
        };
        self.inner.patch(&id.to_owned(), changes).await
    }
}

impl EntityStore<Order> for OrderClient {
    fn inner(&self) -> &ResourceStore<Order> {
        &self.inner
    }
}
