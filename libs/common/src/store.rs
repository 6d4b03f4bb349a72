//! Document store abstraction
//!
//! The site keeps two kinds of records: singleton documents addressed by a
//! well-known key (`profile`, `schedule`) and append-only collections
//! (`inquiries`). Both are stored as JSON objects. [`PgDocumentStore`] backs
//! them with PostgreSQL `jsonb` columns; [`MemoryDocumentStore`] keeps them in
//! process memory for tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// A member of a collection together with its store-assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Value,
}

/// Operations the services need from a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a singleton document, `None` if it was never written
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Shallow-merge the top-level fields of `patch` into a singleton document,
    /// creating it when absent. Last write wins.
    async fn merge(&self, key: &str, patch: Value) -> StoreResult<()>;

    /// Append a document to a collection and return its new id
    async fn append(&self, collection: &str, document: Value) -> StoreResult<String>;

    /// Newest `limit` documents of a collection, ordered by the string field
    /// `order_field` descending
    async fn latest(
        &self,
        collection: &str,
        order_field: &str,
        limit: usize,
    ) -> StoreResult<Vec<StoredDocument>>;
}

fn ensure_object(key: &str, value: &Value) -> StoreResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(StoreError::Corrupt {
            key: key.to_string(),
            reason: "document must be a JSON object".to_string(),
        })
    }
}

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        key TEXT PRIMARY KEY,
        body JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS collection_documents (
        seq BIGSERIAL PRIMARY KEY,
        id UUID NOT NULL UNIQUE,
        collection TEXT NOT NULL,
        body JSONB NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS collection_documents_collection_idx
        ON collection_documents (collection)
    "#,
];

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the document tables if they do not exist yet
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Schema(e.to_string()))?;
        }

        info!("Document store schema ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query("SELECT body FROM documents WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)?;

        row.map(|row| row.try_get::<Value, _>("body"))
            .transpose()
            .map_err(StoreError::Query)
    }

    async fn merge(&self, key: &str, patch: Value) -> StoreResult<()> {
        ensure_object(key, &patch)?;

        sqlx::query(
            r#"
            INSERT INTO documents (key, body)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET body = documents.body || EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(&patch)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        Ok(())
    }

    async fn append(&self, collection: &str, document: Value) -> StoreResult<String> {
        ensure_object(collection, &document)?;

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO collection_documents (id, collection, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(collection)
        .bind(&document)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        Ok(id.to_string())
    }

    async fn latest(
        &self,
        collection: &str,
        order_field: &str,
        limit: usize,
    ) -> StoreResult<Vec<StoredDocument>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM collection_documents
            WHERE collection = $1
            ORDER BY body ->> $2::text DESC, seq DESC
            LIMIT $3
            "#,
        )
        .bind(collection)
        .bind(order_field)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Query)?;

        rows.into_iter()
            .map(|row| -> StoreResult<StoredDocument> {
                let id: Uuid = row.try_get("id").map_err(StoreError::Query)?;
                let body: Value = row.try_get("body").map_err(StoreError::Query)?;
                Ok(StoredDocument {
                    id: id.to_string(),
                    body,
                })
            })
            .collect()
    }
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<String, Value>,
    collections: HashMap<String, Vec<StoredDocument>>,
}

/// In-process document store with the same semantics as [`PgDocumentStore`]
#[derive(Default)]
pub struct MemoryDocumentStore {
    state: RwLock<MemoryState>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.state.read().await.documents.get(key).cloned())
    }

    async fn merge(&self, key: &str, patch: Value) -> StoreResult<()> {
        let Value::Object(fields) = patch else {
            return Err(StoreError::Corrupt {
                key: key.to_string(),
                reason: "document must be a JSON object".to_string(),
            });
        };

        let mut state = self.state.write().await;
        let document = state
            .documents
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Default::default()));

        match document {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }

        Ok(())
    }

    async fn append(&self, collection: &str, document: Value) -> StoreResult<String> {
        ensure_object(collection, &document)?;

        let id = Uuid::new_v4().to_string();
        self.state
            .write()
            .await
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                body: document,
            });

        Ok(id)
    }

    async fn latest(
        &self,
        collection: &str,
        order_field: &str,
        limit: usize,
    ) -> StoreResult<Vec<StoredDocument>> {
        let state = self.state.read().await;
        let Some(documents) = state.collections.get(collection) else {
            return Ok(Vec::new());
        };

        // Newest insertion first, so the stable sort breaks ties the same way
        // the `seq DESC` clause does in PostgreSQL.
        let mut documents: Vec<StoredDocument> = documents.iter().rev().cloned().collect();
        documents.sort_by(|a, b| {
            let a = a.body.get(order_field).and_then(Value::as_str);
            let b = b.body.get(order_field).and_then(Value::as_str);
            b.cmp(&a)
        });
        documents.truncate(limit);

        Ok(documents)
    }
}
