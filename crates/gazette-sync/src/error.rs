//! Error types for the sync crate.

use thiserror::Error;

use gazette_store::StoreError;

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A store operation outside the per-item phase failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A single incoming post failed to apply.
    ///
    /// The rest of the batch was still processed; writes already applied
    /// stay applied.
    #[error("Incoming post {name:?} failed to apply: {source}")]
    Item {
        name: String,
        #[source]
        source: StoreError,
    },
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
