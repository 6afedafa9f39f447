#[cfg(feature = "blob-store")]
pub mod blob;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::{models::SessionTableEntity, storage::StorageResult};

/// Abstraction over the remote blob storage holding the session table and the
/// photo folders.
///
/// Every operation is a single fallible call with a bounded timeout; the core
/// never retries — reconnection is the storage supervisor's job.
pub trait SessionStore: Send + Sync {
    /// Load the whole session table. Called once at startup; a malformed
    /// document is fatal there, a missing one yields an empty table.
    fn load_sessions(&self) -> BoxFuture<'static, StorageResult<SessionTableEntity>>;
    /// Overwrite the whole session table. Idempotent full overwrite.
    fn save_sessions(&self, table: SessionTableEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List the person names in a photo folder (file stems, no extension).
    fn list_folder(&self, folder: &str) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Resolve a temporary, time-limited URL for one person's photo.
    fn fetch_photo_link(&self, folder: &str, name: &str)
    -> BoxFuture<'static, StorageResult<String>>;
    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
