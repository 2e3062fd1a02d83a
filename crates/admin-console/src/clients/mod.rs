//! Type-safe wrappers around [`ResourceStore`](store_framework::ResourceStore).
//!
//! Each client implements [`EntityStore`](store_framework::EntityStore) for the generic
//! operations and adds its entity's extra operations as inherent methods.

pub mod contact_client;
pub mod media_client;
pub mod order_client;
pub mod service_client;
pub mod user_client;

pub use contact_client::*;
pub use media_client::*;
pub use order_client::*;
pub use service_client::*;
pub use user_client::*;
