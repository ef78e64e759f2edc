//! Business-key matching against the local store.

use gazette_store::{Field, FindOptions, PostStore, Selector};
use gazette_types::{DocType, Post, RemotePost};

/// Find the local document a remote post corresponds to, if any.
///
/// Matching is purely by original key: the local document whose
/// `original_name` equals the remote post's business key, limit 1. Identity
/// lookups are never used here since a freshly synchronized remote post
/// carries no local id.
pub fn resolve_existing(
    store: &PostStore,
    remote: &RemotePost,
) -> gazette_store::Result<Option<Post>> {
    let matches = store.find(
        &Selector::doc_type(DocType::Post).eq(Field::OriginalName, remote.name.as_str()),
        &FindOptions::new().with_limit(1),
    )?;
    Ok(matches.into_iter().next())
}
