//! The Resource Store for contact queries.

pub mod entity;

use crate::clients::ContactClient;
use crate::config::ConsoleConfig;
use crate::model::ContactQuery;
use std::sync::Arc;
use store_framework::{StoreActor, Transport};

/// Creates a new store actor and its client.
pub fn new(config: &ConsoleConfig, transport: Arc<dyn Transport>) -> (StoreActor<ContactQuery>, ContactClient) {
    let (actor, store) = StoreActor::new(config.store_buffer, config.default_page_size, transport);
    (actor, ContactClient::new(store))
}
