//! Photos uploaded by partners as proof of work.
use crate::model::Choice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use store_framework::{query_filters, ApiRequest, MultipartUpload};

pub const UPLOAD_PATH: &str = "/media/upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
    Approved,
    Rejected,
}

impl Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaStatus::Pending => "pending",
            MediaStatus::Approved => "approved",
            MediaStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub file_name: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub uploaded_by: String,
    pub order_id: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: MediaStatus,
    #[serde(default)]
    pub notes: String,
}

/// Review decision on an uploaded item.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MediaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A file to attach to an order.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub order_id: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn validate(&self) -> Result<(), String> {
        crate::model::require("Order", &self.order_id)?;
        crate::model::require("File name", &self.file_name)?;
        if self.bytes.is_empty() {
            return Err("File is empty".into());
        }
        Ok(())
    }

    /// `multipart/form-data` with a `file` part and an `orderId` field.
    pub fn into_request(self) -> ApiRequest {
        ApiRequest::post(UPLOAD_PATH).multipart(MultipartUpload {
            file_field: "file".into(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.bytes,
            fields: vec![("orderId".into(), self.order_id)],
        })
    }
}

query_filters! {
    pub struct MediaFilters {
        /// Empty lists media of every order.
        order_id: String => "orderId",
        status: Choice<MediaStatus> => "status",
    }
}
