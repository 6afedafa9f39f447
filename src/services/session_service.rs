//! Session table persistence: startup hydration and full-table flushes.

use tracing::info;

use crate::{error::ServiceError, game::SharedState};

/// Hydrate the in-memory session table from the store.
///
/// Called once at startup before the server accepts traffic; a storage error
/// here is fatal so the process never runs with a silently empty table.
pub async fn load_sessions(state: &SharedState) -> Result<(), ServiceError> {
    let store = state.require_session_store().await?;
    let table = store.load_sessions().await?;
    let count = table.len();
    state.replace_sessions(table);
    info!(sessions = count, "session table loaded from storage");
    Ok(())
}

/// Flush the whole session table to the store.
///
/// Flushes are single-flight: concurrent triggers queue on the gate and each
/// writes the table state it observes, so the last writer persists the newest
/// snapshot. Pending-answer counters reset only after a successful save.
pub async fn flush_sessions(state: &SharedState) -> Result<(), ServiceError> {
    let _gate = state.flush_gate().lock().await;
    let store = state.require_session_store().await?;
    let table = state.snapshot_sessions().await;
    let count = table.len();
    store.save_sessions(table).await?;
    state.reset_flush_counts().await;
    info!(sessions = count, "session table flushed to storage");
    Ok(())
}
