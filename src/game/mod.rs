pub mod conversation;
pub mod judge;
pub mod leaderboard;
pub mod player;
pub mod roster;
pub mod score;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};

use crate::{
    config::AppConfig,
    dao::{models::SessionTableEntity, session_store::SessionStore},
    error::ServiceError,
    game::{leaderboard::LeaderboardEntry, player::PlayerSession, roster::Roster},
};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the session registry, the immutable roster, and
/// the storage handle with its degraded flag.
pub struct AppState {
    config: AppConfig,
    roster: Roster,
    sessions: DashMap<String, Arc<Mutex<PlayerSession>>>,
    store: RwLock<Option<Arc<dyn SessionStore>>>,
    degraded: watch::Sender<bool>,
    flush_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, roster: Roster) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            roster,
            sessions: DashMap::new(),
            store: RwLock::new(None),
            degraded: degraded_tx,
            flush_gate: Mutex::new(()),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The fixed universe of guessable persons.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Obtain a handle to the current session store, if one is installed.
    pub async fn session_store(&self) -> Option<Arc<dyn SessionStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Session store handle, or a degraded-mode error when none is installed.
    pub async fn require_session_store(&self) -> Result<Arc<dyn SessionStore>, ServiceError> {
        self.session_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new session store implementation and leave degraded mode.
    pub async fn install_session_store(&self, store: Arc<dyn SessionStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current session store and enter degraded mode.
    pub async fn clear_session_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }

    /// Per-conversation session handle, created with default values on first
    /// use so a prior high score is never lost to a re-created record.
    pub fn session(&self, conversation_id: &str) -> Arc<Mutex<PlayerSession>> {
        self.sessions
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }

    /// Per-conversation session handle, without creating one.
    pub fn existing_session(&self, conversation_id: &str) -> Option<Arc<Mutex<PlayerSession>>> {
        self.sessions
            .get(conversation_id)
            .map(|entry| entry.value().clone())
    }

    /// Replace the whole in-memory registry with freshly loaded records.
    pub fn replace_sessions(&self, table: SessionTableEntity) {
        self.sessions.clear();
        for (conversation_id, entity) in table {
            let session = PlayerSession::from_entity(entity, &self.roster);
            self.sessions
                .insert(conversation_id, Arc::new(Mutex::new(session)));
        }
    }

    /// Snapshot every session into its persisted record shape.
    ///
    /// Entries are emitted in a sorted, stable order so identical state always
    /// produces an identical document.
    pub async fn snapshot_sessions(&self) -> SessionTableEntity {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort_unstable();

        let mut table = SessionTableEntity::with_capacity(ids.len());
        for id in ids {
            let Some(handle) = self.existing_session(&id) else {
                continue;
            };
            let entity = handle.lock().await.to_entity();
            table.insert(id, entity);
        }
        table
    }

    /// Reset every session's flush counter after a successful flush.
    pub async fn reset_flush_counts(&self) {
        for (_, handle) in self.session_handles() {
            handle.lock().await.reset_flush_count();
        }
    }

    /// Collect the ranking inputs for the leaderboard projection.
    pub async fn leaderboard_entries(&self) -> Vec<LeaderboardEntry> {
        let handles = self.session_handles();
        let mut entries = Vec::with_capacity(handles.len());
        for (conversation_id, handle) in handles {
            let session = handle.lock().await;
            entries.push(LeaderboardEntry {
                conversation_id,
                display_name: session.display_name().to_string(),
                high_score: session.stats().high_score,
            });
        }
        entries
    }

    /// Clone out every (id, handle) pair so callers never hold a registry
    /// shard guard across an await point.
    fn session_handles(&self) -> Vec<(String, Arc<Mutex<PlayerSession>>)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Gate serializing persistence flushes: at most one in-flight write.
    pub fn flush_gate(&self) -> &Mutex<()> {
        &self.flush_gate
    }
}
