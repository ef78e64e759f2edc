//! The post document and its incoming and editing shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doc::{DocType, PostId, Revision};

/// A content document as held by the local store.
///
/// The payload fields (`title`, `excerpt`, `html`, `attributes`, `path`,
/// `url`) are opaque to the engine; only `content` and `published`
/// participate in change detection. `original_name` records the business key
/// as last known from the remote source and is the sync matching key; it is
/// `None` for posts never synchronized or demoted by orphan cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// `None` until the document has been written to the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    /// Business key: human-assigned slug, unique among live posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    /// Local-authoritative publish flag. `None` alongside `original_name`
    /// for never-synchronized or demoted posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl Post {
    /// An empty shell carrying only an identifier.
    ///
    /// Returned by get-or-empty flows when the id is absent from the store,
    /// so the editor can treat "new" and "existing" uniformly.
    pub fn shell(id: PostId) -> Self {
        Self {
            id,
            revision: None,
            doc_type: DocType::Post,
            name: None,
            original_name: None,
            title: None,
            content: None,
            excerpt: None,
            html: None,
            path: None,
            url: None,
            attributes: None,
            published: None,
        }
    }

    /// Build a brand-new local document from a remote post.
    ///
    /// Assigns a fresh identifier and stamps the remote linkage fields
    /// (`original_name`, `published`) from the incoming post.
    pub fn from_remote(remote: RemotePost) -> Self {
        Self::with_identity(PostId::new(), None, remote)
    }

    /// Rebuild a document's payload from a remote post under an existing
    /// identity. Used when sync updates a matched document in place.
    pub fn with_identity(id: PostId, revision: Option<Revision>, remote: RemotePost) -> Self {
        Self {
            id,
            revision,
            doc_type: DocType::Post,
            name: Some(remote.name.clone()),
            original_name: Some(remote.name),
            title: remote.title,
            content: remote.content,
            excerpt: remote.excerpt,
            html: remote.html,
            path: remote.path,
            url: remote.url,
            attributes: remote.attributes,
            published: Some(remote.published),
        }
    }

    /// The orphan projection: what gets re-saved when this post's original
    /// key no longer appears in the remote source.
    ///
    /// Keeps the payload and identity, strips `original_name` and
    /// `published`. Demotion disconnects a post from the remote source; it
    /// never deletes.
    pub fn demoted(&self) -> Post {
        Post {
            id: self.id,
            revision: self.revision,
            doc_type: self.doc_type,
            name: self.name.clone(),
            original_name: None,
            title: self.title.clone(),
            content: self.content.clone(),
            excerpt: self.excerpt.clone(),
            html: self.html.clone(),
            path: self.path.clone(),
            url: self.url.clone(),
            attributes: self.attributes.clone(),
            published: None,
        }
    }
}

/// An incoming post as delivered by the remote synchronization source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePost {
    /// Business key. Required: it is the sync matching key.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(default)]
    pub published: bool,
    /// Transport-only linkage metadata attached by the document transport.
    /// Stripped by the engine before comparison or storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

impl RemotePost {
    /// Create a remote post with only its business key set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            content: None,
            excerpt: None,
            html: None,
            path: None,
            url: None,
            attributes: None,
            published: false,
            links: None,
        }
    }

    /// Set the content body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the publish flag.
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Drop transport-only linkage fields.
    pub fn stripped(mut self) -> Self {
        self.links = None;
        self
    }
}

/// Editor-side save shape: an identifier plus the fields the editor wants to
/// write.
///
/// Saves merge field-by-field over whatever the store already holds: `Some`
/// fields win, `None` fields keep the stored value. The identifier comes
/// from a prior get-or-empty read, so create and update flows look the same
/// to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub id: PostId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostDraft {
    /// Start an empty draft for a document id.
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            name: None,
            original_name: None,
            title: None,
            content: None,
            excerpt: None,
            html: None,
            path: None,
            url: None,
            attributes: None,
            published: None,
        }
    }

    /// Set the business key.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the content body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the publish flag.
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    /// Merge this draft over a stored document. Incoming fields win
    /// field-by-field; the stored identity and revision carry forward and
    /// the document family is forced back to post.
    pub fn apply_to(&self, stored: &Post) -> Post {
        Post {
            id: stored.id,
            revision: stored.revision,
            doc_type: DocType::Post,
            name: self.name.clone().or_else(|| stored.name.clone()),
            original_name: self
                .original_name
                .clone()
                .or_else(|| stored.original_name.clone()),
            title: self.title.clone().or_else(|| stored.title.clone()),
            content: self.content.clone().or_else(|| stored.content.clone()),
            excerpt: self.excerpt.clone().or_else(|| stored.excerpt.clone()),
            html: self.html.clone().or_else(|| stored.html.clone()),
            path: self.path.clone().or_else(|| stored.path.clone()),
            url: self.url.clone().or_else(|| stored.url.clone()),
            attributes: self
                .attributes
                .clone()
                .or_else(|| stored.attributes.clone()),
            published: self.published.or(stored.published),
        }
    }

    /// Materialize the draft as a brand-new document (insert path).
    pub fn into_post(self) -> Post {
        Post {
            id: self.id,
            revision: None,
            doc_type: DocType::Post,
            name: self.name,
            original_name: self.original_name,
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            html: self.html,
            path: self.path,
            url: self.url,
            attributes: self.attributes,
            published: self.published,
        }
    }
}
