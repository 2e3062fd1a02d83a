//! The Resource Store for orders.

pub mod entity;

use crate::clients::OrderClient;
use crate::config::ConsoleConfig;
use crate::model::Order;
use std::sync::Arc;
use store_framework::{StoreActor, Transport};

/// Creates a new store actor and its client.
pub fn new(config: &ConsoleConfig, transport: Arc<dyn Transport>) -> (StoreActor<Order>, OrderClient) {
    let (actor, store) = StoreActor::new(config.store_buffer, config.default_page_size, transport);
    (actor, OrderClient::new(store))
}
