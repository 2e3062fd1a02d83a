//! # Console Lifecycle
//!
//! Builds every store once, wires them to one transport and one credential slot, and
//! tears them down again.
//!
//! ## Startup
//!
//! ```rust,ignore
//! let system = ConsoleSystem::new(&config)?;   // spawns one actor per Resource Store
//! system.session.restore()?;                   // picks up a persisted login
//! system.orders.list().await?;
//! ```
//!
//! ## Logout
//!
//! [`ConsoleSystem::logout`] signs out and resets every store, so nothing fetched under
//! the previous credential stays visible.
//!
//! ## Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of every store channel
//! 2. **Actors detect closure** - `recv()` returns `None`, the actor logs its final size
//! 3. **Await completion** - a panicked actor task is reported as an error
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber. Filter with `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run      # applied state transitions
//! RUST_LOG=debug cargo run     # every request and its ticket
//! ```

pub mod system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use system::ConsoleSystem;
