//! Weekly schedule models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::lenient_text;

/// One recurring session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleItem {
    #[serde(deserialize_with = "lenient_text")]
    pub day: String,
    #[serde(deserialize_with = "lenient_text")]
    pub time: String,
    #[serde(deserialize_with = "lenient_text")]
    pub location: String,
}

impl ScheduleItem {
    /// Trim every field; drop the item unless day and time are both set
    pub fn normalized(self) -> Option<Self> {
        let item = Self {
            day: self.day.trim().to_string(),
            time: self.time.trim().to_string(),
            location: self.location.trim().to_string(),
        };

        (!item.day.is_empty() && !item.time.is_empty()).then_some(item)
    }
}

/// Schedule singleton as served publicly
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Schedule {
    pub items: Vec<ScheduleItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body of `PUT /api/admin/schedule`
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleUpdate {
    #[serde(default)]
    pub items: Vec<ScheduleItem>,
}

/// Fields merged into the stored schedule; `items` replaces the old list
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePatch {
    pub items: Vec<ScheduleItem>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleUpdate {
    pub fn into_patch(self, now: DateTime<Utc>) -> SchedulePatch {
        SchedulePatch {
            items: self
                .items
                .into_iter()
                .filter_map(ScheduleItem::normalized)
                .collect(),
            updated_at: now,
        }
    }
}
