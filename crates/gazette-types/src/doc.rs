//! Document discriminators and identifier newtypes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document family discriminator.
///
/// Every stored document carries one so that other families can share the
/// store later; all queries filter on it. Posts are the only family today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Post,
}

impl DocType {
    /// The discriminator as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
        }
    }

    /// Parse a stored discriminator. Returns `None` for unknown families.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(Self::Post),
            _ => None,
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage identifier for a post document.
///
/// Assigned exactly once, by the sync engine on first insert or by the editor
/// flow that created the draft. Immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its stored string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Store-assigned optimistic-concurrency token.
///
/// Monotonic per document: 1 on insert, advanced by one on every update.
/// Every update or delete must present the revision obtained from a prior
/// read of the same document; the store rejects stale ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(i64);

impl Revision {
    /// The revision assigned to a freshly inserted document.
    pub const FIRST: Revision = Revision(1);

    /// The revision following this one. Only the store adapter advances
    /// revisions; domain code carries them through unchanged.
    pub fn next(self) -> Revision {
        Revision(self.0 + 1)
    }

    /// Materialize a revision read back from storage.
    pub fn from_i64(value: i64) -> Self {
        Revision(value)
    }

    /// The storage representation.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
