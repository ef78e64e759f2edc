//! Local document store for gazette posts.
//!
//! This crate provides the persistent side of the system: a SQLite-backed
//! document store, the editor-facing post lifecycle API, and the workspace
//! session that owns the store handle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session (one per workspace identity)                                   │
//! │    └─ PostStore                                                         │
//! │        - Single SQLite file with WAL mode                               │
//! │        - One `documents` table, families split by doc_type              │
//! │        - Secondary indexes over the sync and editor lookups             │
//! │        - Optimistic concurrency via per-row revisions                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use gazette_store::{Session, SessionConfig, WorkspaceId};
//! use gazette_types::{PostDraft, PostId};
//!
//! let session = Session::open(
//!     SessionConfig::new(),
//!     WorkspaceId::new("alice", "blog"),
//! )?;
//!
//! let draft = PostDraft::new(PostId::new())
//!     .with_name("hello-world")
//!     .with_content("First post.");
//! let saved = session.store().save_post(draft)?;
//!
//! let posts = session.store().list_posts()?;
//! # let _ = (saved, posts);
//! # Ok::<(), gazette_store::StoreError>(())
//! ```

pub mod error;
pub mod find;
pub mod session;
pub mod store;

// Re-export error types
pub use error::{Result, StoreError};

// Re-export the selector language
pub use find::{Clause, Field, FieldValue, FindOptions, Selector, SortOrder};

// Re-export session management
pub use session::{Session, SessionConfig, WorkspaceId};

// Re-export the store
pub use store::{BulkResult, PostStore};
