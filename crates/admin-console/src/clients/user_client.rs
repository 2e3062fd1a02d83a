use crate::model::{ActiveState, AdminUser, UserCreate, UserFiltersPatch, UserUpdate, PARTNER_ROLE};
use store_framework::{EntityStore, FilterUpdate, Page, ResourceStore, StoreError};
use tracing::{debug, instrument};

/// Client for the User store.
///
/// Partners are users with the `partner` role; [`partners`](Self::partners) narrows the
/// list on the server instead of slicing the cached page.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceStore<AdminUser>,
}

impl UserClient {
    pub fn new(inner: ResourceStore<AdminUser>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, draft: UserCreate) -> Result<AdminUser, StoreError> {
        debug!("Sending request");
        self.inner.create(draft).await
    }

    /// Replaces the given fields with `PUT`.
    #[instrument(skip(self))]
    pub async fn update_user(&self, id: &str, changes: UserUpdate) -> Result<AdminUser, StoreError> {
        debug!("Sending request");
        self.inner.update(&id.to_owned(), changes).await
    }

    /// Activates or deactivates an account.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &str, status: ActiveState) -> Result<AdminUser, StoreError> {
        debug!("Sending request");
        let changes = UserUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.inner.patch(&id.to_owned(), changes).await
    }

    /// Lists the first page of partner accounts.
    ///
    /// The role filter is written into the shared Filter State, so later `list` calls on
    /// this store stay narrowed to partners until `set_filters` or `reset_filters`
    /// changes it.
    #[instrument(skip(self))]
    pub async fn partners(&self) -> Result<Page<AdminUser>, StoreError> {
        debug!("Sending request");
        self.inner
            .list_with(FilterUpdate::filters(UserFiltersPatch {
                role: Some(PARTNER_ROLE.to_owned()),
                ..Default::default()
            }))
            .await
    }
}

impl EntityStore<AdminUser> for UserClient {
    fn inner(&self) -> &ResourceStore<AdminUser> {
        &self.inner
    }
}
