//! Host document bundles.
//!
//! The host hands the engine its whole document envelope; this module owns
//! only the `posts` collection and carries every other collection through
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gazette_store::PostStore;
use gazette_types::{Post, RemotePost};

use crate::engine::synchronize;
use crate::error::Result;

/// The host's document envelope on the way in: the posts collection this
/// engine reconciles, plus whatever else the host carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentBundle {
    #[serde(default)]
    pub posts: Vec<RemotePost>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The envelope on the way out: the merged posts collection overrides
/// whatever the bundle previously held under that key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedBundle {
    pub posts: Vec<Post>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Reconcile a bundle's posts collection and hand the envelope back with the
/// merged view in its place.
pub fn synchronize_bundle(store: &PostStore, bundle: DocumentBundle) -> Result<MergedBundle> {
    let outcome = synchronize(store, bundle.posts)?;
    Ok(MergedBundle {
        posts: outcome.posts,
        rest: bundle.rest,
    })
}
