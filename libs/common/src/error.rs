//! Custom error types for the common library
//!
//! This module defines the errors raised by the document store and its
//! connection plumbing.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred while connecting to the database
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while creating the document tables
    #[error("Database schema error: {0}")]
    Schema(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A stored document could not be decoded
    #[error("Corrupt document '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
