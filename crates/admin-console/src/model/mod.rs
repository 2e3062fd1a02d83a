//! Wire shapes of the remote API.
//!
//! Every record is camelCase JSON. Drafts and change sets skip unset fields so a `PATCH`
//! carries only what the caller changed.

pub mod contact;
pub mod dashboard;
pub mod identity;
pub mod media;
pub mod order;
pub mod service;
pub mod user;

pub use contact::*;
pub use dashboard::*;
pub use identity::*;
pub use media::*;
pub use order::*;
pub use service::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use store_framework::FilterValue;

/// A filter on an enumerated field: everything, or one value.
///
/// Sent as `all` or as the value's wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<S> {
    All,
    Only(S),
}

impl<S> Default for Choice<S> {
    fn default() -> Self {
        Choice::All
    }
}

impl<S> From<S> for Choice<S> {
    fn from(value: S) -> Self {
        Choice::Only(value)
    }
}

impl<S: Display> FilterValue for Choice<S> {
    fn to_query(&self) -> String {
        match self {
            Choice::All => "all".to_owned(),
            Choice::Only(value) => value.to_string(),
        }
    }
}

/// `active` / `inactive`, shared by user accounts and the service catalogue filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveState {
    Active,
    Inactive,
}

impl Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveState::Active => write!(f, "active"),
            ActiveState::Inactive => write!(f, "inactive"),
        }
    }
}

/// Draft type of resources the console never creates through a JSON `POST`.
#[derive(Debug, Clone, Serialize)]
pub enum NoDraft {}

pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

pub(crate) fn require_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} must be a non-negative amount"));
    }
    Ok(())
}
