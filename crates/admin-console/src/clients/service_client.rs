use crate::model::{Service, ServiceCreate, ServiceUpdate};
use std::collections::BTreeSet;
use store_framework::{EntityStore, ResourceStore, StoreError};
use tracing::{debug, instrument};

/// Client for the Service catalogue store.
#[derive(Clone)]
pub struct ServiceClient {
    inner: ResourceStore<Service>,
}

impl ServiceClient {
    pub fn new(inner: ResourceStore<Service>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_service(&self, draft: ServiceCreate) -> Result<Service, StoreError> {
        debug!("Sending request");
        self.inner.create(draft).await
    }

    #[instrument(skip(self))]
    pub async fn update_service(&self, id: &str, changes: ServiceUpdate) -> Result<Service, StoreError> {
        debug!("Sending request");
        self.inner.update(&id.to_owned(), changes).await
    }

    /// Shows or hides a service in the public catalogue.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: &str, active: bool) -> Result<Service, StoreError> {
        debug!("Sending request");
        let changes = ServiceUpdate {
            is_active: Some(active),
            ..Default::default()
        };
        self.inner.patch(&id.to_owned(), changes).await
    }

    /// Distinct categories of the cached page, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.inner
            .snapshot()
            .records()
            .iter()
            .map(|service| service.category.clone())
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl EntityStore<Service> for ServiceClient {
    fn inner(&self) -> &ResourceStore<Service> {
        &self.inner
    }
}
