//! Visitor inquiry models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    models::lenient_string,
    notify::Notification,
};

/// Page size when the admin does not ask for one
pub const DEFAULT_INQUIRY_LIMIT: usize = 25;
/// Largest page the admin can request
pub const MAX_INQUIRY_LIMIT: usize = 100;

/// Request body of `POST /api/public/inquiry`
#[derive(Debug, Default, Deserialize)]
pub struct InquiryRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

/// A persisted inquiry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    /// RFC 3339 UTC with fixed-width microseconds so it sorts as a string
    pub created_at: String,
}

impl InquiryRequest {
    /// Trim the fields and require name, email and message
    pub fn validate(self, now: DateTime<Utc>) -> ApiResult<Inquiry> {
        let trimmed = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();

        let name = trimmed(self.name);
        let email = trimmed(self.email);
        let message = trimmed(self.message);
        let phone = Some(trimmed(self.phone)).filter(|p| !p.is_empty());

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ApiError::Validation(
                "name, email and message are required".to_string(),
            ));
        }

        Ok(Inquiry {
            name,
            email,
            phone,
            message,
            created_at: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }
}

impl Inquiry {
    /// Message forwarded to the site owner; replies go to the visitor
    pub fn notification(&self) -> Notification {
        Notification {
            subject: format!("New inquiry from {}", self.name),
            text: format!(
                "New inquiry\nName: {}\nEmail: {}\nPhone: {}\nMessage:\n{}",
                self.name,
                self.email,
                self.phone.as_deref().unwrap_or("-"),
                self.message
            ),
            reply_to: Some(self.email.clone()),
        }
    }
}

/// An inquiry annotated with its store id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InquiryRecord {
    pub id: String,
    #[serde(flatten)]
    pub inquiry: Inquiry,
}

/// Response of `GET /api/admin/inquiries`
#[derive(Debug, Serialize)]
pub struct InquiryListResponse {
    pub items: Vec<InquiryRecord>,
}

/// Query parameters of `GET /api/admin/inquiries`
#[derive(Debug, Default, Deserialize)]
pub struct InquiryQuery {
    pub limit: Option<String>,
}

impl InquiryQuery {
    /// Requested page size clamped to `1..=MAX_INQUIRY_LIMIT`
    ///
    /// Missing, non-numeric and non-positive values use the default.
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .map_or(DEFAULT_INQUIRY_LIMIT, |limit| {
                usize::try_from(limit).map_or(MAX_INQUIRY_LIMIT, |l| l.min(MAX_INQUIRY_LIMIT))
            })
    }
}
