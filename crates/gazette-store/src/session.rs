//! Workspace session management.
//!
//! One store handle per workspace identity (a username + repository pair),
//! opened at session start with its indexes provisioned, and replaced
//! wholesale when the identity changes. The superseded handle is simply
//! dropped; nothing else holds it.

use std::path::PathBuf;

use tracing::info;

use crate::error::{Result, StoreError};
use crate::store::PostStore;

/// Identity of a logical workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceId {
    pub username: String,
    pub repository: String,
}

impl WorkspaceId {
    pub fn new(username: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            repository: repository.into(),
        }
    }

    /// File name of this workspace's store, namespaced by identity.
    pub fn store_file(&self) -> String {
        format!("{}-{}.db", self.username, self.repository)
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.username, self.repository)
    }
}

/// Where workspace stores live on disk.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Override for the data directory; the platform data dir under a
    /// `gazette` folder when `None`.
    pub data_dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit data directory instead of the platform default.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("gazette"))
            .ok_or_else(|| StoreError::Unavailable("no platform data directory".to_string()))
    }
}

/// An open store bound to a workspace identity.
///
/// Owns the handle for the process session; all reads and writes for the
/// workspace go through [`Session::store`].
pub struct Session {
    config: SessionConfig,
    workspace: WorkspaceId,
    store: PostStore,
}

impl Session {
    /// Open (or reopen) the store for a workspace and provision its indexes.
    pub fn open(config: SessionConfig, workspace: WorkspaceId) -> Result<Self> {
        let store = Self::open_store(&config, &workspace)?;
        info!("Session bound to workspace {}", workspace);
        Ok(Self {
            config,
            workspace,
            store,
        })
    }

    /// The bound workspace identity.
    pub fn workspace(&self) -> &WorkspaceId {
        &self.workspace
    }

    /// The open store handle.
    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Bind to a different workspace. The new handle supersedes the old one;
    /// rebinding to the current identity keeps the existing handle.
    pub fn rebind(&mut self, workspace: WorkspaceId) -> Result<()> {
        if workspace == self.workspace {
            return Ok(());
        }
        self.store = Self::open_store(&self.config, &workspace)?;
        info!("Session rebound to workspace {}", workspace);
        self.workspace = workspace;
        Ok(())
    }

    fn open_store(config: &SessionConfig, workspace: &WorkspaceId) -> Result<PostStore> {
        let dir = config.resolve_data_dir()?;
        let store = PostStore::open(dir.join(workspace.store_file()))?;
        store.ensure_indexes()?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use gazette_types::{Post, RemotePost};

    use super::*;

    fn temp_config(dir: &tempfile::TempDir) -> SessionConfig {
        SessionConfig::new().with_data_dir(dir.path())
    }

    #[test]
    fn test_store_file_is_namespaced_by_identity() {
        let workspace = WorkspaceId::new("alice", "blog");
        assert_eq!(workspace.store_file(), "alice-blog.db");
    }

    #[test]
    fn test_rebind_switches_workspaces() {
        let dir = tempfile::TempDir::new().unwrap();

        let mut session = Session::open(
            temp_config(&dir),
            WorkspaceId::new("alice", "blog"),
        )
        .unwrap();
        session
            .store()
            .put(&Post::from_remote(RemotePost::new("alice-post")))
            .unwrap();

        session.rebind(WorkspaceId::new("bob", "notes")).unwrap();
        assert!(session.store().list_posts().unwrap().is_empty());

        // rebinding back sees alice's data again
        session.rebind(WorkspaceId::new("alice", "blog")).unwrap();
        let posts = session.store().list_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].name.as_deref(), Some("alice-post"));
    }

    #[test]
    fn test_rebind_same_identity_is_a_no_op() {
        let dir = tempfile::TempDir::new().unwrap();
        let workspace = WorkspaceId::new("alice", "blog");

        let mut session = Session::open(temp_config(&dir), workspace.clone()).unwrap();
        session
            .store()
            .put(&Post::from_remote(RemotePost::new("kept")))
            .unwrap();

        session.rebind(workspace).unwrap();
        assert_eq!(session.store().list_posts().unwrap().len(), 1);
    }
}
