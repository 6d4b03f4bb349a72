//! Repositories over the document store

use std::sync::Arc;

use common::{
    error::{StoreError, StoreResult},
    store::DocumentStore,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::models::{
    profile::{Profile, ProfilePatch},
    schedule::{Schedule, SchedulePatch},
};

pub mod inquiry;

const PROFILE_KEY: &str = "profile";
const SCHEDULE_KEY: &str = "schedule";

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> StoreResult<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Profile singleton repository
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stored profile with defaults filled in, or the default record
    pub async fn get(&self) -> StoreResult<Profile> {
        match self.store.get(PROFILE_KEY).await? {
            Some(value) => decode(PROFILE_KEY, value),
            None => Ok(Profile::default()),
        }
    }

    /// Stored document as written, or `{}`
    pub async fn get_raw(&self) -> StoreResult<Value> {
        Ok(self.store.get(PROFILE_KEY).await?.unwrap_or_else(|| json!({})))
    }

    /// Merge a validated update into the stored profile
    pub async fn update(&self, patch: &ProfilePatch) -> StoreResult<()> {
        let patch = encode(PROFILE_KEY, patch)?;
        self.store.merge(PROFILE_KEY, patch).await
    }
}

/// Schedule singleton repository
#[derive(Clone)]
pub struct ScheduleRepository {
    store: Arc<dyn DocumentStore>,
}

impl ScheduleRepository {
    /// Create a new schedule repository
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stored schedule, or an empty one
    pub async fn get(&self) -> StoreResult<Schedule> {
        match self.store.get(SCHEDULE_KEY).await? {
            Some(value) => decode(SCHEDULE_KEY, value),
            None => Ok(Schedule::default()),
        }
    }

    /// Stored document as written, or `{"items": []}`
    pub async fn get_raw(&self) -> StoreResult<Value> {
        Ok(self
            .store
            .get(SCHEDULE_KEY)
            .await?
            .unwrap_or_else(|| json!({ "items": [] })))
    }

    /// Replace the item list and stamp the update time
    pub async fn update(&self, patch: &SchedulePatch) -> StoreResult<()> {
        let patch = encode(SCHEDULE_KEY, patch)?;
        self.store.merge(SCHEDULE_KEY, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{profile::ProfileUpdate, schedule::ScheduleUpdate};
    use chrono::Utc;
    use common::store::MemoryDocumentStore;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(MemoryDocumentStore::new())
    }

    #[tokio::test]
    async fn test_profile_defaults_before_first_write() {
        let repo = ProfileRepository::new(store());
        assert_eq!(repo.get().await.unwrap(), Profile::default());
        assert_eq!(repo.get_raw().await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_profile_update_merges() {
        let repo = ProfileRepository::new(store());
        let first: ProfileUpdate =
            serde_json::from_value(json!({"name": "Ana", "bio": "Coach", "age": 30})).unwrap();
        repo.update(&first.into_patch(Utc::now()).unwrap())
            .await
            .unwrap();

        let second: ProfileUpdate = serde_json::from_value(json!({"name": "Ana B."})).unwrap();
        repo.update(&second.into_patch(Utc::now()).unwrap())
            .await
            .unwrap();

        let profile = repo.get().await.unwrap();
        assert_eq!(profile.name, "Ana B.");
        assert_eq!(profile.bio, "Coach");
        assert_eq!(profile.age, Some(30));
        assert!(profile.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_schedule_empty_before_first_write() {
        let repo = ScheduleRepository::new(store());
        assert_eq!(repo.get().await.unwrap(), Schedule::default());
        assert_eq!(repo.get_raw().await.unwrap(), json!({"items": []}));
    }

    #[tokio::test]
    async fn test_schedule_update_replaces_items() {
        let repo = ScheduleRepository::new(store());
        for items in [
            json!([{"day": "Mon", "time": "5pm"}, {"day": "Tue", "time": "6pm"}]),
            json!([{"day": "Wed", "time": "7am", "location": "Park"}]),
        ] {
            let update: ScheduleUpdate = serde_json::from_value(json!({ "items": items })).unwrap();
            repo.update(&update.into_patch(Utc::now())).await.unwrap();
        }

        let schedule = repo.get().await.unwrap();
        assert_eq!(schedule.items.len(), 1);
        assert_eq!(schedule.items[0].day, "Wed");
    }
}
