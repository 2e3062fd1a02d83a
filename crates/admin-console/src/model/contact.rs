//! Support requests sent through the contact form.
use crate::model::Choice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use store_framework::query_filters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryStatus {
    New,
    InProgress,
    Resolved,
}

impl Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryStatus::New => "new",
            QueryStatus::InProgress => "in-progress",
            QueryStatus::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub status: QueryStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QueryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

query_filters! {
    pub struct ContactFilters {
        status: Choice<QueryStatus> => "status",
        assigned_to: String => "assignedTo",
    }
}
