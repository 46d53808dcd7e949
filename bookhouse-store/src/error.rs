//! Error types for the catalog store.

use bookhouse_types::EntityKind;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A referenced id or natural key did not resolve.
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    /// Malformed input, rejected before any store mutation.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failure opening or bootstrapping the database.
    #[error(transparent)]
    Db(#[from] bookhouse_db::DbError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Builds a `NotFound` identifying the missing row by kind and key.
    pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}
