//! Common library for the trainer site
//!
//! This crate provides the persistence plumbing shared by the services:
//! PostgreSQL connectivity, the document store abstraction and its error
//! type.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool};
//! use common::store::{DocumentStore, PgDocumentStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let store = PgDocumentStore::new(init_pool(&config).await?);
//!     store.ensure_schema().await?;
//!     println!("Profile: {:?}", store.get("profile").await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod store;
