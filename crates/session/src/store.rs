//! In-memory session vault
//!
//! One entry per anonymous visitor, keyed by the UUID the client persists.
//! Entries hold provider credentials, the GitHub connection state, pending
//! OAuth handshake tokens, and the per-sink single-flight flags. All access
//! goes through short store methods; nothing hands out references into the
//! map across await points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::types::{ConnectionState, Sink, StoredCredential};

#[derive(Debug, Default)]
struct SessionEntry {
    github: Option<StoredCredential>,
    connection: ConnectionState,
    vercel_token: Option<String>,
    oauth_state: Option<String>,
    export_busy: AtomicBool,
    github_publish_busy: AtomicBool,
    vercel_publish_busy: AtomicBool,
}

impl SessionEntry {
    fn sink_flag(&self, sink: Sink) -> &AtomicBool {
        match sink {
            Sink::Export => &self.export_busy,
            Sink::GithubPublish => &self.github_publish_busy,
            Sink::VercelPublish => &self.vercel_publish_busy,
        }
    }
}

/// Shared handle to the session vault. Cheap to clone; all clones see the
/// same entries.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: Arc<DashMap<Uuid, SessionEntry>>,
    /// Reverse index: pending OAuth state token → visitor. The provider's
    /// callback redirect carries no visitor header, only the state token.
    oauth_index: Arc<DashMap<String, Uuid>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh visitor id with an empty entry
    pub fn create_visitor(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.insert(id, SessionEntry::default());
        id
    }

    /// Make sure an entry exists for this visitor id.
    ///
    /// The vault is in-process state: ids minted before a restart are still
    /// honored and resolve to a fresh disconnected entry.
    pub fn ensure(&self, visitor_id: Uuid) {
        self.entries.entry(visitor_id).or_default();
    }

    pub fn github_credential(&self, visitor_id: Uuid) -> Option<StoredCredential> {
        self.entries.get(&visitor_id).and_then(|e| e.github.clone())
    }

    pub fn set_github_credential(&self, visitor_id: Uuid, credential: StoredCredential) {
        let mut entry = self.entries.entry(visitor_id).or_default();
        entry.github = Some(credential);
    }

    pub fn clear_github_credential(&self, visitor_id: Uuid) {
        if let Some(mut entry) = self.entries.get_mut(&visitor_id) {
            entry.github = None;
        }
    }

    /// Drop the GitHub credential and mark the connection severed in one
    /// step. Used for user-initiated disconnects and for forced disconnects
    /// after the provider rejects the stored token.
    pub fn disconnect_github(&self, visitor_id: Uuid) {
        if let Some(mut entry) = self.entries.get_mut(&visitor_id) {
            entry.github = None;
            entry.connection = ConnectionState::Disconnected;
        }
    }

    pub fn connection_state(&self, visitor_id: Uuid) -> ConnectionState {
        self.entries
            .get(&visitor_id)
            .map(|e| e.connection)
            .unwrap_or_default()
    }

    pub fn set_connection_state(&self, visitor_id: Uuid, state: ConnectionState) {
        let mut entry = self.entries.entry(visitor_id).or_default();
        entry.connection = state;
    }

    pub fn vercel_token(&self, visitor_id: Uuid) -> Option<String> {
        self.entries
            .get(&visitor_id)
            .and_then(|e| e.vercel_token.clone())
    }

    pub fn set_vercel_token(&self, visitor_id: Uuid, token: String) {
        let mut entry = self.entries.entry(visitor_id).or_default();
        entry.vercel_token = Some(token);
    }

    pub fn clear_vercel_token(&self, visitor_id: Uuid) {
        if let Some(mut entry) = self.entries.get_mut(&visitor_id) {
            entry.vercel_token = None;
        }
    }

    /// Record a pending OAuth handshake. A re-triggered authorize replaces
    /// the previous pending token, which stops resolving.
    pub fn begin_oauth(&self, visitor_id: Uuid, state_token: String) {
        let mut entry = self.entries.entry(visitor_id).or_default();
        if let Some(previous) = entry.oauth_state.take() {
            self.oauth_index.remove(&previous);
        }
        entry.oauth_state = Some(state_token.clone());
        drop(entry);
        self.oauth_index.insert(state_token, visitor_id);
    }

    /// Resolve and consume an OAuth state token from the provider callback.
    /// Each token resolves at most once.
    pub fn consume_oauth_state(&self, state_token: &str) -> Option<Uuid> {
        let (_, visitor_id) = self.oauth_index.remove(state_token)?;
        if let Some(mut entry) = self.entries.get_mut(&visitor_id) {
            if entry.oauth_state.as_deref() == Some(state_token) {
                entry.oauth_state = None;
            }
        }
        Some(visitor_id)
    }

    /// Try to start a sink run for this visitor. Returns `None` when the
    /// same sink is already in flight; the returned guard releases the slot
    /// on drop, including on error and panic unwind paths.
    pub fn try_acquire(&self, visitor_id: Uuid, sink: Sink) -> Option<SinkGuard> {
        let entry = self.entries.entry(visitor_id).or_default();
        let acquired = entry
            .sink_flag(sink)
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok();
        drop(entry);

        if acquired {
            Some(SinkGuard {
                store: self.clone(),
                visitor_id,
                sink,
            })
        } else {
            None
        }
    }

    fn release(&self, visitor_id: Uuid, sink: Sink) {
        if let Some(entry) = self.entries.get(&visitor_id) {
            entry.sink_flag(sink).store(false, Ordering::Release);
        }
    }
}

/// RAII handle for an in-flight sink run
#[derive(Debug)]
pub struct SinkGuard {
    store: SessionStore,
    visitor_id: Uuid,
    sink: Sink,
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        self.store.release(self.visitor_id, self.sink);
    }
}
