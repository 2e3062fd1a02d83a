//! The Resource Store for order photos.

pub mod entity;

use crate::clients::MediaClient;
use crate::config::ConsoleConfig;
use crate::model::MediaItem;
use std::sync::Arc;
use store_framework::{StoreActor, Transport};

/// Creates a new store actor and its client.
pub fn new(config: &ConsoleConfig, transport: Arc<dyn Transport>) -> (StoreActor<MediaItem>, MediaClient) {
    let (actor, store) = StoreActor::new(config.store_buffer, config.default_page_size, transport);
    (actor, MediaClient::new(store))
}
