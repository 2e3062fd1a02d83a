//! # Admin Console
//!
//! The data layer of a field-service admin console: one Resource Store per record type,
//! the session, and the dashboard KPIs, all talking to the same remote API.
//!
//! ## Module Tour
//!
//! ### 1. Records ([`model`])
//! Wire shapes of the API (camelCase JSON), their drafts, change sets and typed filters.
//!
//! ### 2. Stores ([`users`], [`orders`], [`services`], [`media`], [`contacts`])
//! Each module implements [`StoreEntity`](store_framework::StoreEntity) for its record and
//! provides a `new()` factory returning the store actor and its client.
//!
//! ### 3. Clients ([`clients`])
//! Typed handles. The generic operations come from
//! [`EntityStore`](store_framework::EntityStore); status changes, assignment and uploads
//! are inherent methods.
//!
//! ### 4. Session and dashboard ([`session`], [`dashboard`], [`credentials`])
//! Sign-in state with a persisted credential, and the single-record KPI cache.
//!
//! ### 5. Orchestration ([`lifecycle`], [`config`])
//! [`ConsoleSystem`](lifecycle::ConsoleSystem) builds everything once and tears it down.
//!
//! ## Running the Demo
//!
//! ```bash
//! ADMIN_CONSOLE_EMAIL=ops@example.com ADMIN_CONSOLE_PASSWORD=secret RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod contacts;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod lifecycle;
pub mod media;
pub mod model;
pub mod orders;
pub mod services;
pub mod session;
pub mod users;

pub use error::ConsoleError;
