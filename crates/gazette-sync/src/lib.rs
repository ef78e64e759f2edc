//! Reconciliation of remote posts with the local gazette store.
//!
//! Given an incoming batch of remote posts and the current store state, the
//! engine matches each post to an existing local document by its original
//! key, classifies the pair, and applies the minimal write:
//!
//! ```text
//! ┌──────────────┐    resolve     ┌──────────────┐    classify
//! │ RemotePost   │ ─────────────▶ │ local match? │ ─────────────▶ insert
//! │ (per item,   │                │ by original  │                update
//! │  input order)│                │ key, limit 1 │                skip
//! └──────────────┘                └──────────────┘
//! ```
//!
//! Local posts that vanished from the remote source are demoted (their
//! remote linkage stripped), never deleted. See [`engine::synchronize`] for
//! the batch semantics and failure rules.

pub mod bundle;
pub mod change;
pub mod engine;
pub mod error;
pub mod resolve;

// Re-export the bundle surface
pub use bundle::{DocumentBundle, MergedBundle, synchronize_bundle};

// Re-export change classification
pub use change::{Change, classify};

// Re-export the engine
pub use engine::{SyncOutcome, synchronize};

// Re-export error types
pub use error::{Result, SyncError};

// Re-export key resolution
pub use resolve::resolve_existing;
