//! Content-change classification for matched post pairs.

use gazette_types::{Post, RemotePost};

/// Whether a matched pair needs a store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Content body and publish state both match; skip the write.
    Unchanged,
    /// Content body or publish state drifted; update in place.
    Changed,
}

/// Classify a matched (existing, incoming) pair.
///
/// The content body is only compared when the existing document has been
/// synchronized before (its original key is present); the publish flag is
/// always compared. No other field difference triggers a write on its own —
/// cosmetic metadata drift stays silent, though it is applied verbatim
/// whenever a write does happen.
pub fn classify(existing: &Post, incoming: &RemotePost) -> Change {
    let content_drifted =
        existing.original_name.is_some() && existing.content != incoming.content;
    let publish_drifted = existing.published != Some(incoming.published);

    if content_drifted || publish_drifted {
        Change::Changed
    } else {
        Change::Unchanged
    }
}
