//! Inquiry repository

use std::sync::Arc;

use common::{error::StoreResult, store::DocumentStore};

use super::{decode, encode};
use crate::models::inquiry::{Inquiry, InquiryRecord};

const INQUIRIES: &str = "inquiries";
const CREATED_AT: &str = "createdAt";

/// Append-only inquiry collection
#[derive(Clone)]
pub struct InquiryRepository {
    store: Arc<dyn DocumentStore>,
}

impl InquiryRepository {
    /// Create a new inquiry repository
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a validated inquiry and return its id
    pub async fn create(&self, inquiry: &Inquiry) -> StoreResult<String> {
        let document = encode(INQUIRIES, inquiry)?;
        self.store.append(INQUIRIES, document).await
    }

    /// Newest inquiries first
    pub async fn latest(&self, limit: usize) -> StoreResult<Vec<InquiryRecord>> {
        self.store
            .latest(INQUIRIES, CREATED_AT, limit)
            .await?
            .into_iter()
            .map(|doc| -> StoreResult<InquiryRecord> {
                Ok(InquiryRecord {
                    inquiry: decode(&doc.id, doc.body)?,
                    id: doc.id,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inquiry::InquiryRequest;
    use chrono::{Duration, Utc};
    use common::store::MemoryDocumentStore;

    fn inquiry(name: &str, minutes_ago: i64) -> Inquiry {
        InquiryRequest {
            name: Some(name.to_string()),
            email: Some(format!("{name}@example.com")),
            phone: None,
            message: Some("Hello".to_string()),
        }
        .validate(Utc::now() - Duration::minutes(minutes_ago))
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_returns_newest_first_with_ids() {
        let repo = InquiryRepository::new(Arc::new(MemoryDocumentStore::new()));
        let old_id = repo.create(&inquiry("old", 10)).await.unwrap();
        let new_id = repo.create(&inquiry("new", 1)).await.unwrap();

        let records = repo.latest(25).await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![new_id.as_str(), old_id.as_str()]);
        assert_eq!(records[0].inquiry.name, "new");
    }

    #[tokio::test]
    async fn test_latest_respects_limit() {
        let repo = InquiryRepository::new(Arc::new(MemoryDocumentStore::new()));
        for i in 0..5 {
            repo.create(&inquiry(&format!("n{i}"), i)).await.unwrap();
        }

        assert_eq!(repo.latest(3).await.unwrap().len(), 3);
    }
}
