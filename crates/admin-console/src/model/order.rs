//! A cleaning job booked by a customer.
use crate::model::{require, require_amount, Choice};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use store_framework::query_filters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl OrderStatus {
    /// Orders that still need work.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub service_id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    #[serde(default)]
    pub partner_assigned: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
}

/// Payload for booking an order on behalf of a customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: String,
    pub service_id: String,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl OrderCreate {
    pub fn validate(&self) -> Result<(), String> {
        require("Customer", &self.user_id)?;
        require("Service", &self.service_id)?;
        require_amount("Total amount", self.total_amount)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// `Some(None)` sends `null` and clears the assignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_assigned: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

query_filters! {
    /// Filters of the order list. Dates are `YYYY-MM-DD`, empty for open-ended.
    pub struct OrderFilters {
        status: Choice<OrderStatus> => "status",
        start_date: String => "startDate",
        end_date: String => "endDate",
        partner_id: String => "partnerId",
    }
}
