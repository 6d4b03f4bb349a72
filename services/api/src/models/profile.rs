//! Trainer profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    models::lenient_string,
};

/// Name shown before the admin has written a profile
pub const DEFAULT_NAME: &str = "Personal Trainer";

/// Public view of the profile singleton
///
/// Fields absent from the stored document fall back to the same values as
/// the default record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub place: String,
    pub phone: String,
    pub age: Option<i64>,
    pub photo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            bio: String::new(),
            place: String::new(),
            phone: String::new(),
            age: None,
            photo_url: String::new(),
            updated_at: None,
        }
    }
}

/// Keeps an explicit `null` distinguishable from an absent field
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Request body of `PUT /api/admin/profile`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Value>,
}

/// Fields merged into the stored profile
///
/// Omitted optional fields keep their stored value. `age: Some(None)` writes
/// an explicit `null`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Option<i64>>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileUpdate {
    /// Validate the update and turn it into a merge patch stamped with `now`
    pub fn into_patch(self, now: DateTime<Utc>) -> ApiResult<ProfilePatch> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::Validation("name is required".to_string()))?
            .to_string();

        let age = self.age.map(coerce_age).transpose()?;
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());

        Ok(ProfilePatch {
            name,
            bio: trim(self.bio),
            place: trim(self.place),
            phone: trim(self.phone),
            photo_url: trim(self.photo_url),
            age,
            updated_at: now,
        })
    }
}

/// `null` and `""` clear the age; integers and integer strings set it
fn coerce_age(value: Value) -> ApiResult<Option<i64>> {
    let invalid = || ApiError::Validation("age must be a number".to_string());

    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(age), _) => Ok(Some(age)),
            (None, Some(age)) if age.fract() == 0.0 => Ok(Some(age as i64)),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}
