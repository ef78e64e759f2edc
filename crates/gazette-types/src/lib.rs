//! Shared document types for the gazette post store.
//!
//! This crate defines the post entity as it flows between the three layers of
//! the system: the shape delivered by the remote synchronization source
//! ([`RemotePost`]), the shape held by the local store ([`Post`]), and the
//! shape the editor submits on save ([`PostDraft`]).
//!
//! Identifiers and revisions are newtypes: a [`PostId`] is assigned once and
//! never changes, while a [`Revision`] is the store's optimistic-concurrency
//! token and is only ever advanced by the store itself.

pub mod doc;
pub mod post;

pub use doc::{DocType, PostId, Revision};
pub use post::{Post, PostDraft, RemotePost};
