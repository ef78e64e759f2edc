//! SQLite-backed document store.
//!
//! A single `documents` table holds every document family, discriminated by
//! `doc_type`; secondary indexes cover the lookups the sync engine and the
//! editor API depend on. One connection behind a mutex, WAL journal mode.
//!
//! Optimistic concurrency: every row carries a monotonic `rev`. Updates and
//! deletes must present the revision from a prior read; a stale one is a
//! [`StoreError::Conflict`], surfaced to the caller and never retried here.

mod post_ops;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info};

use gazette_types::{DocType, Post, PostId, Revision};

use crate::error::{Result, StoreError};
use crate::find::{FindOptions, Selector};

/// Current schema version for migrations.
const SCHEMA_VERSION: i32 = 1;

/// Column list shared by every document SELECT, in `row_to_post` order.
const COLUMNS: &str = "id, rev, doc_type, name, original_name, title, content, \
                       excerpt, html, path, url, attributes, published";

/// Document store backed by SQLite.
///
/// Opening is idempotent: reopening the same path binds to the same
/// underlying data. The publish flag is stored as 0/1 and translated to
/// `bool` when rows are materialized.
pub struct PostStore {
    /// The SQLite connection (wrapped in Mutex for thread safety).
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for PostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostStore").finish_non_exhaustive()
    }
}

/// Per-item outcome of a bulk write.
#[derive(Debug)]
pub struct BulkResult {
    pub id: PostId,
    pub result: Result<Revision>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Initialization
// ─────────────────────────────────────────────────────────────────────────────

impl PostStore {
    /// Open or create a document store at the given path.
    ///
    /// Creates the database file, the schema, and the secondary indexes if
    /// they don't exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!(
                        "cannot create store directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )
        .map_err(|e| StoreError::Unavailable(format!("cannot open {}: {e}", path.display())))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Document store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("In-memory document store created");
        Ok(store)
    }

    /// Initialize the database with pragmas, schema, and indexes.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        // WAL for better concurrent read behavior
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        self.create_schema(&conn)?;
        Self::ensure_indexes_on(&conn)?;

        Ok(())
    }

    /// Create the database schema.
    fn create_schema(&self, conn: &Connection) -> Result<()> {
        let current_version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            debug!("Schema up to date (version {})", current_version);
            return Ok(());
        }

        conn.execute_batch(
            r#"
            -- Documents table: every family in one table, split by doc_type
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                rev INTEGER NOT NULL,
                doc_type TEXT NOT NULL,
                name TEXT,
                original_name TEXT,
                title TEXT,
                content TEXT,
                excerpt TEXT,
                html TEXT,
                path TEXT,
                url TEXT,
                attributes TEXT,
                published INTEGER
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        info!("Schema created (version {})", SCHEMA_VERSION);
        Ok(())
    }

    /// Declare the secondary indexes the engine and editor API query by.
    ///
    /// Called once at session start; safe to call redundantly.
    pub fn ensure_indexes(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Self::ensure_indexes_on(&conn)
    }

    fn ensure_indexes_on(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_name_type
                ON documents(name, doc_type);
            CREATE INDEX IF NOT EXISTS idx_documents_type
                ON documents(doc_type);
            CREATE INDEX IF NOT EXISTS idx_documents_original_type
                ON documents(original_name, doc_type);
            CREATE INDEX IF NOT EXISTS idx_documents_published_type
                ON documents(published, doc_type);
            CREATE INDEX IF NOT EXISTS idx_documents_original_published_type
                ON documents(original_name, published, doc_type);
            "#,
        )?;

        debug!("Secondary indexes ensured");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Operations
// ─────────────────────────────────────────────────────────────────────────────

impl PostStore {
    /// Find documents matching a selector.
    ///
    /// Returns an ordered sequence when `sort` is given, storage order
    /// otherwise; an empty vector (never an error) when nothing matches.
    pub fn find(&self, selector: &Selector, options: &FindOptions) -> Result<Vec<Post>> {
        let conn = self.conn.lock().unwrap();

        let (where_sql, params_vec) = selector.to_sql();
        let mut sql = format!("SELECT {COLUMNS} FROM documents");
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }
        if let Some((field, order)) = options.sort {
            sql.push_str(" ORDER BY ");
            sql.push_str(field.column());
            sql.push(' ');
            sql.push_str(order.sql());
        }
        if let Some(limit) = options.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.to_string());
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|b| b.as_ref()).collect();
        let mut rows = stmt.query(params_refs.as_slice())?;

        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(Self::row_to_post(row)?);
        }

        Ok(posts)
    }

    /// Get a document by id. Absence is an error here; the editor-facing
    /// get-or-empty conversion lives in the lifecycle API.
    pub fn get(&self, id: PostId) -> Result<Post> {
        let conn = self.conn.lock().unwrap();

        let mut stmt =
            conn.prepare(&format!("SELECT {COLUMNS} FROM documents WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id.to_string()])?;

        match rows.next()? {
            Some(row) => Self::row_to_post(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Insert or update a document, returning the new revision.
    ///
    /// A post without a revision inserts (Conflict when the id is already
    /// taken); a post with one updates under the optimistic check (Conflict
    /// on a stale revision, NotFound when the row is gone).
    pub fn put(&self, post: &Post) -> Result<Revision> {
        let conn = self.conn.lock().unwrap();
        Self::put_on(&conn, post)
    }

    /// Write a batch of documents, best-effort: each item succeeds or fails
    /// independently and one failure never aborts the rest.
    pub fn bulk_put(&self, posts: &[Post]) -> Vec<BulkResult> {
        let conn = self.conn.lock().unwrap();

        posts
            .iter()
            .map(|post| BulkResult {
                id: post.id,
                result: Self::put_on(&conn, post),
            })
            .collect()
    }

    /// Delete a document by id and revision.
    pub fn delete(&self, id: PostId, revision: Revision) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let deleted = conn.execute(
            "DELETE FROM documents WHERE id = ?1 AND rev = ?2",
            params![id.to_string(), revision.as_i64()],
        )?;

        if deleted == 0 {
            return Err(Self::conflict_or_missing(&conn, id)?);
        }

        debug!("Deleted document {}", id);
        Ok(())
    }

    fn put_on(conn: &Connection, post: &Post) -> Result<Revision> {
        let attributes_json = post
            .attributes
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let published = post.published.map(|b| b as i64);

        match post.revision {
            None => {
                let inserted = conn.execute(
                    r#"
                    INSERT OR IGNORE INTO documents
                        (id, rev, doc_type, name, original_name, title, content,
                         excerpt, html, path, url, attributes, published)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                    "#,
                    params![
                        post.id.to_string(),
                        Revision::FIRST.as_i64(),
                        post.doc_type.as_str(),
                        post.name,
                        post.original_name,
                        post.title,
                        post.content,
                        post.excerpt,
                        post.html,
                        post.path,
                        post.url,
                        attributes_json,
                        published,
                    ],
                )?;

                if inserted == 0 {
                    return Err(StoreError::Conflict(post.id));
                }

                debug!("Inserted document {}", post.id);
                Ok(Revision::FIRST)
            }
            Some(revision) => {
                let next = revision.next();
                let updated = conn.execute(
                    r#"
                    UPDATE documents
                    SET rev = ?2, doc_type = ?3, name = ?4, original_name = ?5,
                        title = ?6, content = ?7, excerpt = ?8, html = ?9,
                        path = ?10, url = ?11, attributes = ?12, published = ?13
                    WHERE id = ?1 AND rev = ?14
                    "#,
                    params![
                        post.id.to_string(),
                        next.as_i64(),
                        post.doc_type.as_str(),
                        post.name,
                        post.original_name,
                        post.title,
                        post.content,
                        post.excerpt,
                        post.html,
                        post.path,
                        post.url,
                        attributes_json,
                        published,
                        revision.as_i64(),
                    ],
                )?;

                if updated == 0 {
                    return Err(Self::conflict_or_missing(conn, post.id)?);
                }

                debug!("Updated document {} to rev {}", post.id, next);
                Ok(next)
            }
        }
    }

    /// Classify a zero-row write: the id exists under another revision
    /// (Conflict) or not at all (NotFound).
    fn conflict_or_missing(conn: &Connection, id: PostId) -> Result<StoreError> {
        let exists = conn.query_row(
            "SELECT 1 FROM documents WHERE id = ?1",
            params![id.to_string()],
            |_| Ok(()),
        );
        match exists {
            Ok(()) => Ok(StoreError::Conflict(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(StoreError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Convert a database row to a Post, in `COLUMNS` order.
    fn row_to_post(row: &rusqlite::Row) -> Result<Post> {
        let id_str: String = row.get(0)?;
        let rev: i64 = row.get(1)?;
        let doc_type_str: String = row.get(2)?;
        let attributes_json: Option<String> = row.get(11)?;
        let published: Option<i64> = row.get(12)?;

        let id = PostId::parse(&id_str)?;
        let doc_type = DocType::parse(&doc_type_str).ok_or_else(|| {
            StoreError::InvalidDocument(format!("unknown doc_type {doc_type_str:?}"))
        })?;
        let attributes = attributes_json
            .map(|json| serde_json::from_str(&json))
            .transpose()?;

        Ok(Post {
            id,
            revision: Some(Revision::from_i64(rev)),
            doc_type,
            name: row.get(3)?,
            original_name: row.get(4)?,
            title: row.get(5)?,
            content: row.get(6)?,
            excerpt: row.get(7)?,
            html: row.get(8)?,
            path: row.get(9)?,
            url: row.get(10)?,
            attributes,
            published: published.map(|v| v != 0),
        })
    }
}

#[cfg(test)]
mod tests {
    use gazette_types::RemotePost;

    use super::*;
    use crate::find::{Field, SortOrder};

    fn create_test_store() -> PostStore {
        PostStore::open_in_memory().unwrap()
    }

    fn sample_post(name: &str, content: &str) -> Post {
        Post::from_remote(RemotePost::new(name).with_content(content))
    }

    #[test]
    fn test_put_insert_and_get() {
        let store = create_test_store();

        let post = sample_post("hello", "body");
        let rev = store.put(&post).unwrap();
        assert_eq!(rev, Revision::FIRST);

        let fetched = store.get(post.id).unwrap();
        assert_eq!(fetched.name.as_deref(), Some("hello"));
        assert_eq!(fetched.content.as_deref(), Some("body"));
        assert_eq!(fetched.revision, Some(Revision::FIRST));
        assert_eq!(fetched.published, Some(false));
    }

    #[test]
    fn test_insert_existing_id_is_conflict() {
        let store = create_test_store();

        let post = sample_post("hello", "body");
        store.put(&post).unwrap();

        // second insert without a revision must not silently overwrite
        let err = store.put(&post).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == post.id));
    }

    #[test]
    fn test_update_bumps_revision_and_checks_staleness() {
        let store = create_test_store();

        let mut post = sample_post("hello", "v1");
        let rev1 = store.put(&post).unwrap();

        post.revision = Some(rev1);
        post.content = Some("v2".to_string());
        let rev2 = store.put(&post).unwrap();
        assert_eq!(rev2, rev1.next());

        // writing again with the stale rev1 is a conflict
        let err = store.put(&post).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let fetched = store.get(post.id).unwrap();
        assert_eq!(fetched.content.as_deref(), Some("v2"));
        assert_eq!(fetched.revision, Some(rev2));
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let store = create_test_store();

        let mut post = sample_post("ghost", "body");
        post.revision = Some(Revision::FIRST);
        let err = store.put(&post).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = create_test_store();
        let err = store.get(PostId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_delete_checks_revision() {
        let store = create_test_store();

        let post = sample_post("hello", "body");
        let rev = store.put(&post).unwrap();

        let err = store.delete(post.id, rev.next()).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        store.delete(post.id, rev).unwrap();
        assert!(matches!(
            store.get(post.id),
            Err(StoreError::NotFound(_))
        ));

        let err = store.delete(post.id, rev).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_bulk_put_is_best_effort_per_item() {
        let store = create_test_store();

        let good = sample_post("a", "body");
        let mut stale = sample_post("b", "body");
        store.put(&stale).unwrap();
        stale.revision = Some(Revision::from_i64(99)); // wrong on purpose
        let also_good = sample_post("c", "body");

        let results = store.bulk_put(&[good.clone(), stale.clone(), also_good.clone()]);
        assert_eq!(results.len(), 3);
        assert!(results[0].result.is_ok());
        assert!(matches!(results[1].result, Err(StoreError::Conflict(_))));
        assert!(results[2].result.is_ok());

        // the failure in the middle did not abort the last item
        assert_eq!(store.get(also_good.id).unwrap().name.as_deref(), Some("c"));
    }

    #[test]
    fn test_find_with_sort_and_limit() {
        let store = create_test_store();

        for name in ["alpha", "charlie", "bravo"] {
            store.put(&sample_post(name, "body")).unwrap();
        }

        let posts = store
            .find(
                &Selector::doc_type(DocType::Post),
                &FindOptions::new().sorted(Field::Name, SortOrder::Desc),
            )
            .unwrap();
        let names: Vec<_> = posts.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, ["charlie", "bravo", "alpha"]);

        let limited = store
            .find(
                &Selector::doc_type(DocType::Post),
                &FindOptions::new()
                    .sorted(Field::Name, SortOrder::Asc)
                    .with_limit(1),
            )
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].name.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_find_null_fields_never_match_not_in() {
        let store = create_test_store();

        let synced = sample_post("linked", "body");
        store.put(&synced).unwrap();

        let mut local_only = sample_post("local", "body");
        local_only.original_name = None;
        store.put(&local_only).unwrap();

        let matches = store
            .find(
                &Selector::doc_type(DocType::Post)
                    .not_in(Field::OriginalName, vec!["other".to_string()]),
                &FindOptions::new(),
            )
            .unwrap();

        // only the post with a present original_name qualifies
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, synced.id);
    }

    #[test]
    fn test_find_nothing_is_empty_not_error() {
        let store = create_test_store();
        let posts = store
            .find(
                &Selector::doc_type(DocType::Post).eq(Field::Name, "missing"),
                &FindOptions::new(),
            )
            .unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_ensure_indexes_is_idempotent() {
        let store = create_test_store();
        store.ensure_indexes().unwrap();
        store.ensure_indexes().unwrap();
    }

    #[test]
    fn test_attributes_round_trip() {
        let store = create_test_store();

        let mut post = sample_post("with-attrs", "body");
        post.attributes = Some(serde_json::json!({"tags": ["rust", "sync"]}));
        store.put(&post).unwrap();

        let fetched = store.get(post.id).unwrap();
        assert_eq!(fetched.attributes, post.attributes);
    }

    #[test]
    fn test_open_on_disk_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.db");

        let store = PostStore::open(&path).unwrap();
        store.put(&sample_post("persisted", "body")).unwrap();
        drop(store);

        // reopening the same path binds to the same data
        let reopened = PostStore::open(&path).unwrap();
        let posts = reopened
            .find(&Selector::doc_type(DocType::Post), &FindOptions::new())
            .unwrap();
        assert_eq!(posts.len(), 1);
    }
}
