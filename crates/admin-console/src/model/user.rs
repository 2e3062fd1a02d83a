//! An account managed from the console: customers, partners and staff.
//!
//! Partners are users whose `role` is `partner`.
use crate::model::{require, ActiveState, Choice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_framework::query_filters;

pub const PARTNER_ROLE: &str = "partner";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub role: String,
    pub status: ActiveState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn is_partner(&self) -> bool {
        self.role == PARTNER_ROLE
    }
}

/// Payload for registering a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub status: ActiveState,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), String> {
        require("Name", &self.name)?;
        require("Email", &self.email)?;
        require("Role", &self.role)
    }
}

/// Partial update for a user. Unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActiveState>,
}

query_filters! {
    /// Filters of the user list.
    pub struct UserFilters {
        search: String => "search",
        status: Choice<ActiveState> => "status",
        /// Empty matches every role.
        role: String => "role",
    }
}
