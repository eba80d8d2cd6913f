//! In-memory session table
//!
//! Backs both plain sessions (no expiry policy, `Bare` entries) and expiring
//! sessions (`Timed` entries checked against an `ExpiryPolicy`). Expired
//! entries stay in the table until `purge_expired` or `destroy_session`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{generate_session_id, id_prefix, SessionError, SessionStore};
use crate::expiry::{Clock, ExpiryPolicy, SystemClock};

/// A session id's binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEntry {
    /// Plain binding, never expires
    Bare { user_id: String },
    /// Binding with its creation time
    Timed {
        user_id: String,
        created_at: DateTime<Utc>,
    },
}

impl SessionEntry {
    pub fn user_id(&self) -> &str {
        match self {
            SessionEntry::Bare { user_id } | SessionEntry::Timed { user_id, .. } => user_id,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            SessionEntry::Bare { .. } => None,
            SessionEntry::Timed { created_at, .. } => Some(*created_at),
        }
    }
}

/// In-memory session store
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    expiry: Option<ExpiryPolicy>,
    clock: Arc<dyn Clock>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Plain sessions, valid until destroyed
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            expiry: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sessions stamped with their creation time and checked against `policy`
    pub fn with_expiry(policy: ExpiryPolicy) -> Self {
        Self {
            expiry: Some(policy),
            ..Self::new()
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn expiry(&self) -> Option<ExpiryPolicy> {
        self.expiry
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Store an entry under a caller-chosen id
    pub fn insert(&self, session_id: impl Into<String>, entry: SessionEntry) {
        self.sessions.write().insert(session_id.into(), entry);
    }

    /// Drop every entry that would no longer resolve
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| self.resolve(entry, now).is_some());
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
        purged
    }

    fn resolve<'a>(&self, entry: &'a SessionEntry, now: DateTime<Utc>) -> Option<&'a str> {
        let Some(policy) = self.expiry else {
            return Some(entry.user_id());
        };
        let created_at = entry.created_at()?;
        if policy.is_expired(created_at, now) {
            return None;
        }
        Some(entry.user_id())
    }

    fn new_entry(&self, user_id: &str) -> SessionEntry {
        let user_id = user_id.to_string();
        match self.expiry {
            None => SessionEntry::Bare { user_id },
            Some(_) => SessionEntry::Timed {
                user_id,
                created_at: self.clock.now(),
            },
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, user_id: &str) -> Result<String, SessionError> {
        if user_id.is_empty() {
            return Err(SessionError::MissingUserId);
        }

        let entry = self.new_entry(user_id);
        let mut sessions = self.sessions.write();
        let mut session_id = generate_session_id();
        while sessions.contains_key(&session_id) {
            session_id = generate_session_id();
        }
        sessions.insert(session_id.clone(), entry);

        tracing::debug!(session = id_prefix(&session_id), user_id, "Session created");
        Ok(session_id)
    }

    async fn user_id_for_session(&self, session_id: &str) -> Option<String> {
        if session_id.is_empty() {
            return None;
        }
        let now = self.clock.now();
        let sessions = self.sessions.read();
        let entry = sessions.get(session_id)?;
        let user_id = self.resolve(entry, now);
        if user_id.is_none() {
            tracing::debug!(session = id_prefix(session_id), "Session expired");
        }
        user_id.map(str::to_string)
    }

    async fn destroy_session(&self, session_id: &str) -> Result<bool, SessionError> {
        if session_id.is_empty() {
            return Ok(false);
        }
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let resolvable = sessions
            .get(session_id)
            .is_some_and(|entry| self.resolve(entry, now).is_some());
        if !resolvable {
            return Ok(false);
        }
        sessions.remove(session_id);
        tracing::debug!(session = id_prefix(session_id), "Session destroyed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::ManualClock;
    use chrono::Duration;
    use std::collections::HashSet;

    fn expiring(seconds: i64) -> (MemorySessionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store =
            MemorySessionStore::with_expiry(ExpiryPolicy::seconds(seconds)).with_clock(clock.clone());
        (store, clock)
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = MemorySessionStore::new();

        let session_id = store.create_session("u1").await.unwrap();
        assert_eq!(store.user_id_for_session(&session_id).await, Some("u1".to_string()));

        assert!(store.destroy_session(&session_id).await.unwrap());
        assert_eq!(store.user_id_for_session(&session_id).await, None);
        assert!(!store.destroy_session(&session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let store = MemorySessionStore::new();
        assert!(matches!(
            store.create_session("").await,
            Err(SessionError::MissingUserId)
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_tokens_are_distinct() {
        let store = MemorySessionStore::new();
        let mut ids = HashSet::new();
        for _ in 0..100 {
            ids.insert(store.create_session("u1").await.unwrap());
        }
        assert_eq!(ids.len(), 100);
        assert_eq!(store.len(), 100);
    }

    #[tokio::test]
    async fn test_unknown_and_empty_ids() {
        let store = MemorySessionStore::new();
        assert_eq!(store.user_id_for_session("").await, None);
        assert_eq!(store.user_id_for_session("nope").await, None);
        assert!(!store.destroy_session("").await.unwrap());
    }

    #[tokio::test]
    async fn test_expiring_session() {
        let (store, clock) = expiring(1);
        let session_id = store.create_session("u1").await.unwrap();

        clock.advance(Duration::milliseconds(500));
        assert_eq!(store.user_id_for_session(&session_id).await, Some("u1".to_string()));

        clock.advance(Duration::milliseconds(1500));
        assert_eq!(store.user_id_for_session(&session_id).await, None);

        // Lazy: still in the table, but no longer destroyable
        assert_eq!(store.len(), 1);
        assert!(!store.destroy_session(&session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_positive_duration_never_expires() {
        for seconds in [0, -5] {
            let (store, clock) = expiring(seconds);
            let session_id = store.create_session("u1").await.unwrap();
            clock.advance(Duration::days(3650));
            assert_eq!(store.user_id_for_session(&session_id).await, Some("u1".to_string()));
        }
    }

    #[tokio::test]
    async fn test_bare_entry_under_expiry_policy() {
        let (store, _clock) = expiring(0);
        store.insert(
            "legacy",
            SessionEntry::Bare {
                user_id: "u1".to_string(),
            },
        );
        assert_eq!(store.user_id_for_session("legacy").await, None);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (store, clock) = expiring(10);
        let old = store.create_session("u1").await.unwrap();
        clock.advance(Duration::seconds(8));
        let fresh = store.create_session("u2").await.unwrap();
        clock.advance(Duration::seconds(5));

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.user_id_for_session(&old).await, None);
        assert_eq!(store.user_id_for_session(&fresh).await, Some("u2".to_string()));
    }

    #[tokio::test]
    async fn test_plain_store_purges_nothing() {
        let store = MemorySessionStore::new();
        store.create_session("u1").await.unwrap();
        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_and_lookup() {
        let store = Arc::new(MemorySessionStore::new());

        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let user_id = format!("user-{}", worker);
                let mut ids = Vec::new();
                for _ in 0..50 {
                    let session_id = store.create_session(&user_id).await.unwrap();
                    assert_eq!(
                        store.user_id_for_session(&session_id).await.as_deref(),
                        Some(user_id.as_str())
                    );
                    ids.push(session_id);
                }
                ids
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        assert_eq!(all.len(), 400);
        assert_eq!(store.len(), 400);
    }
}
