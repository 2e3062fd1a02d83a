//! The Resource Store for service catalogue.

pub mod entity;

use crate::clients::ServiceClient;
use crate::config::ConsoleConfig;
use crate::model::Service;
use std::sync::Arc;
use store_framework::{StoreActor, Transport};

/// Creates a new store actor and its client.
pub fn new(config: &ConsoleConfig, transport: Arc<dyn Transport>) -> (StoreActor<Service>, ServiceClient) {
    let (actor, store) = StoreActor::new(config.store_buffer, config.default_page_size, transport);
    (actor, ServiceClient::new(store))
}
