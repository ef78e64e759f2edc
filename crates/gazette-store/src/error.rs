//! Error types for the store crate.

use thiserror::Error;

use gazette_types::PostId;

/// Errors that can occur in the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Attribute payload (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Referenced document is absent.
    #[error("Not found: {0}")]
    NotFound(PostId),

    /// Stale revision on an update or delete.
    #[error("Revision conflict on {0}")]
    Conflict(PostId),

    /// Another live document already holds the business key.
    #[error("A post named {0:?} already exists")]
    NameConflict(String),

    /// Store could not be opened or provisioned.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Invalid stored identifier.
    #[error("Invalid id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// Stored row does not materialize into a document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
