//! # User Store
//!
//! The Resource Store for user accounts, partners included.
//!
//! ## Structure
//!
//! - [`entity`] - [`StoreEntity`](store_framework::StoreEntity) implementation for [`AdminUser`]
//! - [`new()`] - Factory function that creates the store actor and its client
//!
//! ## Usage
//!
//! ```rust
//! use admin_console::config::ConsoleConfig;
//! use admin_console::users;
//! use store_framework::mock::MockTransport;
//! use store_framework::EntityStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = users::new(&ConsoleConfig::default(), Arc::new(MockTransport::new()));
//!     tokio::spawn(actor.run());
//!     assert!(client.snapshot().records().is_empty());
//! }
//! ```

pub mod entity;

use crate::clients::UserClient;
use crate::config::ConsoleConfig;
use crate::model::AdminUser;
use std::sync::Arc;
use store_framework::{StoreActor, Transport};

/// Creates a new User store actor and its client.
pub fn new(config: &ConsoleConfig, transport: Arc<dyn Transport>) -> (StoreActor<AdminUser>, UserClient) {
    let (actor, store) = StoreActor::new(config.store_buffer, config.default_page_size, transport);
    (actor, UserClient::new(store))
}
