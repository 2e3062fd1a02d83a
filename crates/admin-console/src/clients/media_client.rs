//! # Media Client
//!
//! Uploads are multipart requests sent from the caller's task, so a large file never
//! holds up other operations on the Media store.
use crate::model::{MediaItem, MediaStatus, MediaUpdate, MediaUpload};
use store_framework::{EntityStore, ResourceStore, StoreError};
use tracing::{debug, instrument};

const REVIEW_FAILED: &str = "Failed to update media status";

/// Client for the Media store.
#[derive(Clone)]
pub struct MediaClient {
    inner: ResourceStore<MediaItem>,
}

impl MediaClient {
    pub fn new(inner: ResourceStore<MediaItem>) -> Self {
        Self { inner }
    }

    /// Uploads a file for an order and appends the new item to the cached list.
    #[instrument(skip(self, upload), fields(order_id = %upload.order_id, file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload(&self, upload: MediaUpload) -> Result<MediaItem, StoreError> {
        if let Err(message) = upload.validate() {
            return Err(self.inner.reject(StoreError::Validation(message)).await);
        }
        debug!("Sending request");
        self.inner.upload(upload.into_request()).await
    }

    /// Approves or rejects an item, optionally with reviewer notes.
    #[instrument(skip(self))]
    pub async fn review(
        &self,
        id: &str,
        status: MediaStatus,
        notes: Option<String>,
    ) -> Result<MediaItem, StoreError> {
        debug!("Sending request");
        let changes = MediaUpdate {
            status: Some(status),
            notes,
        };
        self.inner
            .patch_with_fallback(&id.to_owned(), changes, REVIEW_FAILED)
            .await
    }
}

impl EntityStore<MediaItem> for MediaClient {
    fn inner(&self) -> &ResourceStore<MediaItem> {
        &self.inner
    }
}
