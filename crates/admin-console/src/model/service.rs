//! Entries of the service catalogue.
//!
//! A service carries priced options. Options drafted in a form before the service is saved
//! have no server identity yet; they get a [`OptionKey::Draft`] key so lists can tell them
//! apart, and that key is never sent.

use crate::model::{require, require_amount, ActiveState, Choice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use store_framework::query_filters;

static NEXT_DRAFT_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of a service option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Assigned by the server.
    Saved(String),
    /// Client-side only, rendered as `temp_<n>`.
    Draft(u64),
}

impl OptionKey {
    pub fn draft() -> Self {
        OptionKey::Draft(NEXT_DRAFT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, OptionKey::Draft(_))
    }
}

impl Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKey::Saved(id) => f.write_str(id),
            OptionKey::Draft(n) => write!(f, "temp_{n}"),
        }
    }
}

impl Serialize for OptionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OptionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(OptionKey::Saved)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOption {
    #[serde(rename = "id", default = "OptionKey::draft", skip_serializing_if = "OptionKey::is_draft")]
    pub key: OptionKey,
    pub name: String,
    pub price: f64,
}

impl ServiceOption {
    /// A new option that has not been saved yet.
    pub fn draft(name: impl Into<String>, price: f64) -> Self {
        Self {
            key: OptionKey::draft(),
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub options: Vec<ServiceOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreate {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub duration: u32,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub images: Vec<String>,
    pub options: Vec<ServiceOption>,
}

impl ServiceCreate {
    pub fn validate(&self) -> Result<(), String> {
        require("Name", &self.name)?;
        require("Category", &self.category)?;
        require_amount("Price", self.price)?;
        for option in &self.options {
            require("Option name", &option.name)?;
            require_amount("Option price", option.price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ServiceOption>>,
}

query_filters! {
    /// Filters of the service catalogue.
    pub struct ServiceFilters {
        search: String => "search",
        category: String => "category",
        active: Choice<ActiveState> => "active",
    }
}
