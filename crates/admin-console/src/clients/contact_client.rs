use crate::model::{ContactQuery, ContactUpdate, QueryStatus};
use store_framework::{EntityStore, ResourceStore, StoreError};
use tracing::{debug, instrument};

/// Client for the Contact Query store.
#[derive(Clone)]
pub struct ContactClient {
    inner: ResourceStore<ContactQuery>,
}

impl ContactClient {
    pub fn new(inner: ResourceStore<ContactQuery>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: QueryStatus) -> Result<ContactQuery, StoreError> {
        debug!("Sending request");
        let changes = ContactUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.inner
            .patch_with_fallback(&id.to_owned(), changes, "Failed to update query status")
            .await
    }

    /// Hands a query to an admin. Only the assignee field is sent.
    #[instrument(skip(self))]
    pub async fn assign(&self, id: &str, admin_id: &str) -> Result<ContactQuery, StoreError> {
        debug!("Sending request");
        let changes = ContactUpdate {
            assigned_to: Some(admin_id.to_owned()),
            ..Default::default()
        };
        self.inner
            .patch_with_fallback(&id.to_owned(), changes, "Failed to assign query")
            .await
    }
}

impl EntityStore<ContactQuery> for ContactClient {
    fn inner(&self) -> &ResourceStore<ContactQuery> {
        &self.inner
    }
}
