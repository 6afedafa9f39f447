//! In-process store used by tests and credential-less local runs.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;

use crate::dao::{
    models::SessionTableEntity,
    session_store::SessionStore,
    storage::{StorageError, StorageResult},
};

/// [`SessionStore`] keeping everything in process memory.
///
/// Photo links resolve to `memory://{folder}/{name}.jpg` placeholders so the
/// reply-assembly path can be exercised without network access.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    sessions: SessionTableEntity,
    folders: Vec<(String, Vec<String>)>,
}

impl MemorySessionStore {
    /// Empty store with no folders and an empty session table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a photo folder with person names.
    pub fn with_folder(self, folder: impl Into<String>, names: Vec<String>) -> Self {
        self.inner
            .lock()
            .expect("memory store lock")
            .folders
            .push((folder.into(), names));
        self
    }

    /// Seed the persisted session table.
    pub fn with_sessions(self, sessions: SessionTableEntity) -> Self {
        self.inner.lock().expect("memory store lock").sessions = sessions;
        self
    }

    /// Snapshot of the last saved session table.
    pub fn saved_sessions(&self) -> SessionTableEntity {
        self.inner.lock().expect("memory store lock").sessions.clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_sessions(&self) -> BoxFuture<'static, StorageResult<SessionTableEntity>> {
        let sessions = self.saved_sessions();
        Box::pin(async move { Ok(sessions) })
    }

    fn save_sessions(&self, table: SessionTableEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.lock().expect("memory store lock").sessions = table;
            Ok(())
        })
    }

    fn list_folder(&self, folder: &str) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let folder = folder.to_string();
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.lock().expect("memory store lock");
            guard
                .folders
                .iter()
                .find(|(name, _)| *name == folder)
                .map(|(_, names)| names.clone())
                .ok_or_else(|| {
                    StorageError::unavailable(
                        format!("folder `{folder}` not seeded"),
                        std::io::Error::from(std::io::ErrorKind::NotFound),
                    )
                })
        })
    }

    fn fetch_photo_link(
        &self,
        folder: &str,
        name: &str,
    ) -> BoxFuture<'static, StorageResult<String>> {
        let link = format!("memory://{folder}/{name}.jpg");
        Box::pin(async move { Ok(link) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
