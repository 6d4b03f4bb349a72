//! Integration tests for the PostgreSQL document store
//!
//! These tests need a reachable PostgreSQL instance at `DATABASE_URL` and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    store::{DocumentStore, PgDocumentStore},
};
use serde_json::json;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_pg_document_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    assert!(health_check(&pool).await, "Database health check failed");

    let store = PgDocumentStore::new(pool);
    store.ensure_schema().await?;

    let key = format!("integration-{}", uuid::Uuid::new_v4());
    store.merge(&key, json!({"name": "Ana", "bio": "Coach"})).await?;
    store.merge(&key, json!({"name": "Ana B."})).await?;
    assert_eq!(
        store.get(&key).await?,
        Some(json!({"name": "Ana B.", "bio": "Coach"})),
        "Merge should keep unmentioned fields"
    );

    let collection = format!("integration-{}", uuid::Uuid::new_v4());
    let older = store
        .append(&collection, json!({"createdAt": "2024-01-01T00:00:00.000000Z"}))
        .await?;
    let newer = store
        .append(&collection, json!({"createdAt": "2024-01-02T00:00:00.000000Z"}))
        .await?;

    let latest = store.latest(&collection, "createdAt", 10).await?;
    let ids: Vec<&str> = latest.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec![newer.as_str(), older.as_str()]);

    Ok(())
}
