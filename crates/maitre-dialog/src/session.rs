//! Process-wide session store.
//!
//! Sessions are keyed by a caller-supplied identifier. The outer map lock
//! is held only to look up or insert a handle; each session carries its own
//! async mutex so a turn keeps exclusive write access across API calls
//! while other sessions proceed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use tracing::debug;

use maitre_core::Session;

/// A shared handle to one session's state.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// In-memory session store. Sessions never expire behind the engine's back;
/// eviction is an explicit operation the host calls when it wants one.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
    ttl: Option<Duration>,
}

impl SessionStore {
    /// A store whose sessions live until explicitly removed.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: None,
        }
    }

    /// A store whose sessions become eligible for [`evict_expired`] after
    /// `idle_secs` seconds without a turn.
    ///
    /// [`evict_expired`]: SessionStore::evict_expired
    pub fn with_ttl(idle_secs: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Some(Duration::seconds(idle_secs)),
        }
    }

    /// Look up the session for `id`, creating it on first contact.
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        let mut sessions = self.lock_map();
        if let Some(handle) = sessions.get(id) {
            return Arc::clone(handle);
        }
        debug!(session_id = id, "creating session");
        let handle: SessionHandle = Arc::new(tokio::sync::Mutex::new(Session::new()));
        sessions.insert(id.to_string(), Arc::clone(&handle));
        handle
    }

    /// Remove a session outright. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.lock_map().remove(id).is_some()
    }

    /// Drop every session idle for longer than the configured TTL.
    /// Returns the number evicted; a store without a TTL evicts nothing.
    pub fn evict_expired(&self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;
        let mut sessions = self.lock_map();
        let before = sessions.len();
        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(session) => {
                let keep = session.last_active_at > cutoff;
                if !keep {
                    debug!(session_id = id.as_str(), "evicting idle session");
                }
                keep
            }
            // A locked session is mid-turn and by definition not idle.
            Err(_) => true,
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_map().is_empty()
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<String, SessionHandle>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maitre_core::FlowState;

    #[tokio::test]
    async fn test_get_or_create_creates_once() {
        let store = SessionStore::new();
        let first = store.get_or_create("alice");
        let second = store.get_or_create("alice");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_by_id() {
        let store = SessionStore::new();
        {
            let handle = store.get_or_create("alice");
            let mut session = handle.lock().await;
            session.state = FlowState::InBookingFlow;
        }
        let handle = store.get_or_create("bob");
        let session = handle.lock().await;
        assert_eq!(session.state, FlowState::Idle);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new();
        store.get_or_create("alice");
        assert!(store.remove("alice"));
        assert!(!store.remove("alice"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_survives_round_trip() {
        let store = SessionStore::new();
        {
            let handle = store.get_or_create("alice");
            let mut session = handle.lock().await;
            session.slots.party = Some(4);
        }
        let handle = store.get_or_create("alice");
        let session = handle.lock().await;
        assert_eq!(session.slots.party, Some(4));
    }

    #[tokio::test]
    async fn test_evict_without_ttl_is_noop() {
        let store = SessionStore::new();
        store.get_or_create("alice");
        assert_eq!(store.evict_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_evict_removes_only_idle_sessions() {
        let store = SessionStore::with_ttl(60);
        {
            let handle = store.get_or_create("stale");
            let mut session = handle.lock().await;
            session.last_active_at = Utc::now() - Duration::seconds(120);
        }
        store.get_or_create("fresh");

        assert_eq!(store.evict_expired(), 1);
        assert_eq!(store.len(), 1);
        // The fresh session is still there.
        let handle = store.get_or_create("fresh");
        assert!(Arc::ptr_eq(&handle, &store.get_or_create("fresh")));
    }

    #[tokio::test]
    async fn test_evict_skips_sessions_mid_turn() {
        let store = SessionStore::with_ttl(60);
        let handle = store.get_or_create("busy");
        {
            let mut session = handle.lock().await;
            session.last_active_at = Utc::now() - Duration::seconds(120);
            // Still holding the lock: the session is mid-turn.
            assert_eq!(store.evict_expired(), 0);
        }
        // Released: now it is genuinely idle and old.
        assert_eq!(store.evict_expired(), 1);
    }
}
