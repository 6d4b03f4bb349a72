//! API models for request and response payloads

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

pub mod inquiry;
pub mod profile;
pub mod schedule;

/// Accept any JSON scalar for a text field; `null` counts as absent
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(de::Error::custom("expected a string")),
    }
}

/// [`lenient_string`] for fields that default to `""`
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}

/// Request for admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "username", alias = "email")]
    pub identity: String,
    #[serde(default)]
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Acknowledgement returned by write endpoints
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
