//! Batch reconciliation of remote posts against the local store.
//!
//! One [`synchronize`] call merges an incoming batch with local state:
//!
//! 1. Orphan demotion: local posts whose original key no longer appears in
//!    the batch are re-saved with their remote linkage stripped (never
//!    deleted). Best-effort per document.
//! 2. Per-item phase, input order preserved: each incoming post is stripped
//!    of transport linkage, resolved against the store by original key, and
//!    then inserted, updated, or carried through unchanged.
//!
//! One item's failure does not stop the remaining items, but the first
//! failure propagates as the aggregate error once the whole batch has been
//! processed. Writes already applied stay applied; callers must expect
//! partial-effect batches on error.

use tracing::{debug, info, warn};

use gazette_store::{Field, FindOptions, PostStore, Selector, StoreError};
use gazette_types::{DocType, Post, RemotePost};

use crate::change::{Change, classify};
use crate::error::{Result, SyncError};
use crate::resolve::resolve_existing;

/// What happened to one incoming post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Inserted,
    Updated,
    Unchanged,
}

/// Result of one `synchronize` run.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// Merged view of the incoming batch, input order preserved.
    pub posts: Vec<Post>,
    /// Incoming posts with no local match, inserted fresh.
    pub inserted: usize,
    /// Matched posts whose content or publish state drifted.
    pub updated: usize,
    /// Matched posts that needed no write.
    pub unchanged: usize,
    /// Local orphans re-saved without their remote linkage.
    pub demoted: usize,
}

/// Reconcile an incoming batch of remote posts with the local store.
pub fn synchronize(store: &PostStore, incoming: Vec<RemotePost>) -> Result<SyncOutcome> {
    let demoted = demote_orphans(store, &incoming)?;

    let mut outcome = SyncOutcome {
        demoted,
        ..Default::default()
    };
    let mut first_failure: Option<SyncError> = None;

    for remote in incoming {
        let remote = remote.stripped();
        let name = remote.name.clone();
        match apply_one(store, remote) {
            Ok((post, applied)) => {
                match applied {
                    Applied::Inserted => outcome.inserted += 1,
                    Applied::Updated => outcome.updated += 1,
                    Applied::Unchanged => outcome.unchanged += 1,
                }
                outcome.posts.push(post);
            }
            Err(source) => {
                warn!("Incoming post {:?} failed to apply: {}", name, source);
                if first_failure.is_none() {
                    first_failure = Some(SyncError::Item { name, source });
                }
            }
        }
    }

    if let Some(failure) = first_failure {
        return Err(failure);
    }

    info!(
        "Synchronized {} posts ({} inserted, {} updated, {} unchanged, {} demoted)",
        outcome.posts.len(),
        outcome.inserted,
        outcome.updated,
        outcome.unchanged,
        outcome.demoted
    );
    Ok(outcome)
}

/// Apply one incoming post: insert when unmatched, update when drifted,
/// otherwise carry the stored identity through without a write.
fn apply_one(
    store: &PostStore,
    remote: RemotePost,
) -> std::result::Result<(Post, Applied), StoreError> {
    match resolve_existing(store, &remote)? {
        None => {
            debug!("No local match for {:?}; inserting", remote.name);
            let mut post = Post::from_remote(remote);
            let revision = store.put(&post)?;
            post.revision = Some(revision);
            Ok((post, Applied::Inserted))
        }
        Some(existing) => match classify(&existing, &remote) {
            Change::Changed => {
                debug!("Local post {:?} drifted; updating {}", remote.name, existing.id);
                let mut post = Post::with_identity(existing.id, existing.revision, remote);
                let revision = store.put(&post)?;
                post.revision = Some(revision);
                Ok((post, Applied::Updated))
            }
            Change::Unchanged => {
                debug!("Local post {:?} unchanged", remote.name);
                let post = Post::with_identity(existing.id, existing.revision, remote);
                Ok((post, Applied::Unchanged))
            }
        },
    }
}

/// Re-save local posts whose original key disappeared from the incoming
/// batch, stripped of their remote linkage.
///
/// Posts are demoted, never deleted here; deletion stays an explicit editor
/// action. Finding nothing is a no-op. Each re-save is best-effort: one
/// document's failure does not roll back the others.
fn demote_orphans(store: &PostStore, incoming: &[RemotePost]) -> gazette_store::Result<usize> {
    let names: Vec<String> = incoming.iter().map(|post| post.name.clone()).collect();

    let orphans = store.find(
        &Selector::doc_type(DocType::Post).not_in(Field::OriginalName, names),
        &FindOptions::new(),
    )?;
    if orphans.is_empty() {
        debug!("No orphaned posts to demote");
        return Ok(0);
    }

    let projected: Vec<Post> = orphans.iter().map(Post::demoted).collect();
    let mut demoted = 0;
    for item in store.bulk_put(&projected) {
        match item.result {
            Ok(_) => demoted += 1,
            Err(e) => warn!("Failed to demote orphaned post {}: {}", item.id, e),
        }
    }

    info!("Demoted {} orphaned posts", demoted);
    Ok(demoted)
}
