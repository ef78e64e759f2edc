//! Editor-facing post operations.
//!
//! The lifecycle API the editor UI consumes directly: listing, fetching,
//! saving with business-key uniqueness, deleting. Everything here goes
//! through the adapter primitives in the parent module.

use tracing::debug;

use gazette_types::{DocType, Post, PostDraft, PostId};

use crate::error::{Result, StoreError};
use crate::find::{Field, FindOptions, Selector, SortOrder};

use super::PostStore;

impl PostStore {
    /// All posts with a business key, sorted by key descending.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        self.find(
            &Selector::doc_type(DocType::Post).exists(Field::Name),
            &FindOptions::new().sorted(Field::Name, SortOrder::Desc),
        )
    }

    /// Published posts still linked to the remote source, sorted by original
    /// key descending.
    pub fn list_published_posts(&self) -> Result<Vec<Post>> {
        self.find(
            &Selector::doc_type(DocType::Post)
                .exists(Field::OriginalName)
                .eq(Field::Published, true),
            &FindOptions::new().sorted(Field::OriginalName, SortOrder::Desc),
        )
    }

    /// Fetch one post by id. Absence propagates as NotFound; selected-post
    /// flows want to hear about it.
    pub fn get_post(&self, id: PostId) -> Result<Post> {
        self.get(id)
    }

    /// Fetch one post by id, converting absence into an empty shell carrying
    /// only the id. Used by editor "new or existing" flows; every other
    /// failure still propagates.
    pub fn get_or_empty(&self, id: PostId) -> Result<Post> {
        match self.get(id) {
            Ok(post) => Ok(post),
            Err(StoreError::NotFound(_)) => Ok(Post::shell(id)),
            Err(e) => Err(e),
        }
    }

    /// Create or update a post from the editor.
    ///
    /// Rejects with [`StoreError::NameConflict`] when a *different* document
    /// already holds the draft's business key. Otherwise merges the draft
    /// over the stored fields under the current revision, or inserts fresh
    /// when the id is absent. Returns the saved post carrying the post-write
    /// revision.
    pub fn save_post(&self, draft: PostDraft) -> Result<Post> {
        if let Some(name) = &draft.name {
            let clash = self.find(
                &Selector::doc_type(DocType::Post)
                    .ne(Field::Id, draft.id.to_string())
                    .eq(Field::Name, name.as_str()),
                &FindOptions::new().with_limit(1),
            )?;
            if !clash.is_empty() {
                return Err(StoreError::NameConflict(name.clone()));
            }
        }

        let mut post = match self.get(draft.id) {
            Ok(stored) => draft.apply_to(&stored),
            Err(StoreError::NotFound(_)) => draft.into_post(),
            Err(e) => return Err(e),
        };

        let revision = self.put(&post)?;
        post.revision = Some(revision);

        debug!("Saved post {}", post.id);
        Ok(post)
    }

    /// Delete a post by its id and current revision.
    pub fn delete_post(&self, post: &Post) -> Result<()> {
        let revision = post.revision.ok_or_else(|| {
            StoreError::InvalidDocument(format!("delete of {} requires a revision", post.id))
        })?;
        self.delete(post.id, revision)
    }
}

#[cfg(test)]
mod tests {
    use gazette_types::{RemotePost, Revision};

    use super::*;

    fn create_test_store() -> PostStore {
        PostStore::open_in_memory().unwrap()
    }

    fn insert_synced(store: &PostStore, name: &str, published: bool) -> Post {
        let mut post = Post::from_remote(
            RemotePost::new(name)
                .with_content("body")
                .with_published(published),
        );
        post.revision = Some(store.put(&post).unwrap());
        post
    }

    #[test]
    fn test_list_posts_sorted_by_name_descending() {
        let store = create_test_store();
        insert_synced(&store, "apple", false);
        insert_synced(&store, "cherry", false);
        insert_synced(&store, "banana", false);

        let posts = store.list_posts().unwrap();
        let names: Vec<_> = posts.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, ["cherry", "banana", "apple"]);
    }

    #[test]
    fn test_list_posts_skips_nameless_documents() {
        let store = create_test_store();
        insert_synced(&store, "named", false);

        let mut nameless = Post::from_remote(RemotePost::new("temp"));
        nameless.name = None;
        store.put(&nameless).unwrap();

        let posts = store.list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].name.as_deref(), Some("named"));
    }

    #[test]
    fn test_list_published_filters_and_sorts() {
        let store = create_test_store();
        insert_synced(&store, "alpha", true);
        insert_synced(&store, "bravo", false);
        insert_synced(&store, "delta", true);

        // demoted posts have no original_name and never show up here
        let orphan = insert_synced(&store, "orphan", true);
        store.put(&orphan.demoted()).unwrap();

        let published = store.list_published_posts().unwrap();
        let names: Vec<_> = published
            .iter()
            .filter_map(|p| p.original_name.as_deref())
            .collect();
        assert_eq!(names, ["delta", "alpha"]);
    }

    #[test]
    fn test_get_or_empty_returns_shell_for_missing_id() {
        let store = create_test_store();
        let id = PostId::new();

        let shell = store.get_or_empty(id).unwrap();
        assert_eq!(shell.id, id);
        assert_eq!(shell.revision, None);
        assert_eq!(shell.name, None);
        assert_eq!(shell.content, None);

        let existing = insert_synced(&store, "real", false);
        let fetched = store.get_or_empty(existing.id).unwrap();
        assert_eq!(fetched.name.as_deref(), Some("real"));
    }

    #[test]
    fn test_save_inserts_fresh_document() {
        let store = create_test_store();

        let draft = PostDraft::new(PostId::new())
            .with_name("brand-new")
            .with_content("hello");
        let saved = store.save_post(draft).unwrap();

        assert_eq!(saved.revision, Some(Revision::FIRST));
        assert_eq!(saved.doc_type, DocType::Post);
        assert_eq!(store.get(saved.id).unwrap().name.as_deref(), Some("brand-new"));
    }

    #[test]
    fn test_save_merges_over_stored_fields() {
        let store = create_test_store();
        let existing = insert_synced(&store, "keep-title", false);

        let draft = PostDraft::new(existing.id).with_content("edited");
        let saved = store.save_post(draft).unwrap();

        assert_eq!(saved.content.as_deref(), Some("edited"));
        // fields the draft left out keep their stored values
        assert_eq!(saved.name.as_deref(), Some("keep-title"));
        assert_eq!(saved.original_name.as_deref(), Some("keep-title"));
        assert_eq!(saved.revision, existing.revision.map(Revision::next));
    }

    #[test]
    fn test_save_rejects_duplicate_name_on_other_document() {
        let store = create_test_store();
        insert_synced(&store, "taken", false);
        let mine = insert_synced(&store, "mine", false);

        let draft = PostDraft::new(mine.id).with_name("taken");
        let err = store.save_post(draft).unwrap_err();
        assert!(matches!(err, StoreError::NameConflict(name) if name == "taken"));
    }

    #[test]
    fn test_save_accepts_own_name() {
        let store = create_test_store();
        let mine = insert_synced(&store, "mine", false);

        // re-saving under the same name on the same id is not a conflict
        let draft = PostDraft::new(mine.id)
            .with_name("mine")
            .with_content("edited");
        let saved = store.save_post(draft).unwrap();
        assert_eq!(saved.content.as_deref(), Some("edited"));
    }

    #[test]
    fn test_delete_post_requires_revision() {
        let store = create_test_store();
        let post = insert_synced(&store, "doomed", false);

        let mut unread = post.clone();
        unread.revision = None;
        assert!(matches!(
            store.delete_post(&unread),
            Err(StoreError::InvalidDocument(_))
        ));

        store.delete_post(&post).unwrap();
        assert!(matches!(store.get(post.id), Err(StoreError::NotFound(_))));
    }
}
