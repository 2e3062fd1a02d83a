//! # Observability & Tracing
//!
//! Structured logging for the whole console.
//!
//! - Store actors log applied transitions at `info`, keyed by `resource`
//! - Clients open a span per operation (`#[instrument]`) and log the request at `debug`
//! - Failures and superseded responses are logged at `warn`
//!
//! ```text
//! INFO Store started resource="/orders"
//! DEBUG update_status{id="O1" status=Completed}: Sending request
//! INFO Settled resource="/orders" op=Update seq=4 applied="updated" total=12
//! WARN Discarded superseded response resource="/orders" op=List seq=3
//! ```

/// Installs the global subscriber. Levels come from `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
