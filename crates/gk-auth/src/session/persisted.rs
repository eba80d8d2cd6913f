//! Database-backed sessions
//!
//! Session ids live in the `user_sessions` table through a `UserSessionStore`,
//! so they survive restarts and are shared between processes.

use std::sync::Arc;

use async_trait::async_trait;
use gk_db::{RepositoryError, UserSessionStore};

use super::{generate_session_id, id_prefix, SessionError, SessionStore};
use crate::expiry::{Clock, ExpiryPolicy, SystemClock};

/// Session store persisting records through a `UserSessionStore`
pub struct PersistedSessionStore {
    records: Arc<dyn UserSessionStore>,
    expiry: ExpiryPolicy,
    clock: Arc<dyn Clock>,
}

impl PersistedSessionStore {
    pub fn new(records: Arc<dyn UserSessionStore>) -> Self {
        Self {
            records,
            expiry: ExpiryPolicy::never(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Check the stored creation time against `policy` on lookup
    pub fn with_expiry(mut self, policy: ExpiryPolicy) -> Self {
        self.expiry = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl SessionStore for PersistedSessionStore {
    async fn create_session(&self, user_id: &str) -> Result<String, SessionError> {
        if user_id.is_empty() {
            return Err(SessionError::MissingUserId);
        }
        let session_id = generate_session_id();
        self.records.create(user_id, &session_id).await?;
        tracing::debug!(session = id_prefix(&session_id), user_id, "Session persisted");
        Ok(session_id)
    }

    async fn user_id_for_session(&self, session_id: &str) -> Option<String> {
        if session_id.is_empty() {
            return None;
        }
        let record = match self.records.find_by_session_id(session_id).await {
            Ok(record) => record?,
            Err(e) => {
                tracing::warn!(session = id_prefix(session_id), error = %e, "Session lookup failed");
                return None;
            }
        };

        if self.expiry.is_expired(record.created_at, self.clock.now()) {
            tracing::debug!(session = id_prefix(session_id), "Persisted session expired");
            return None;
        }
        Some(record.user_id)
    }

    async fn destroy_session(&self, session_id: &str) -> Result<bool, SessionError> {
        if session_id.is_empty() {
            return Ok(false);
        }
        let record = match self.records.find_by_session_id(session_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(false),
            Err(e) => {
                tracing::warn!(session = id_prefix(session_id), error = %e, "Session lookup failed");
                return Ok(false);
            }
        };
        match self.records.delete(&record).await {
            Ok(()) => {
                tracing::debug!(session = id_prefix(session_id), "Persisted session removed");
                Ok(true)
            }
            // Removed by a concurrent logout after the lookup
            Err(RepositoryError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::ManualClock;
    use chrono::{Duration, Utc};
    use gk_db::{MemoryUserSessionStore, RepositoryResult};
    use gk_models::UserSession;

    /// Reads work, writes fail
    struct ReadOnlyRecords(MemoryUserSessionStore);

    #[async_trait]
    impl UserSessionStore for ReadOnlyRecords {
        async fn create(&self, _user_id: &str, _session_id: &str) -> RepositoryResult<UserSession> {
            Err(RepositoryError::Unavailable("read-only replica".into()))
        }

        async fn find_by_session_id(&self, session_id: &str) -> RepositoryResult<Option<UserSession>> {
            self.0.find_by_session_id(session_id).await
        }

        async fn delete(&self, _record: &UserSession) -> RepositoryResult<()> {
            Err(RepositoryError::Unavailable("read-only replica".into()))
        }
    }

    struct UnreachableRecords;

    #[async_trait]
    impl UserSessionStore for UnreachableRecords {
        async fn create(&self, _user_id: &str, _session_id: &str) -> RepositoryResult<UserSession> {
            Err(RepositoryError::Unavailable("connection refused".into()))
        }

        async fn find_by_session_id(&self, _session_id: &str) -> RepositoryResult<Option<UserSession>> {
            Err(RepositoryError::Unavailable("connection refused".into()))
        }

        async fn delete(&self, _record: &UserSession) -> RepositoryResult<()> {
            Err(RepositoryError::Unavailable("connection refused".into()))
        }
    }

    /// Another request deletes the record right after every lookup
    struct RacingRecords(MemoryUserSessionStore);

    #[async_trait]
    impl UserSessionStore for RacingRecords {
        async fn create(&self, user_id: &str, session_id: &str) -> RepositoryResult<UserSession> {
            self.0.create(user_id, session_id).await
        }

        async fn find_by_session_id(&self, session_id: &str) -> RepositoryResult<Option<UserSession>> {
            let record = self.0.find_by_session_id(session_id).await?;
            if let Some(ref record) = record {
                self.0.delete(record).await?;
            }
            Ok(record)
        }

        async fn delete(&self, record: &UserSession) -> RepositoryResult<()> {
            self.0.delete(record).await
        }
    }

    #[tokio::test]
    async fn test_persisted_lifecycle() {
        let records = Arc::new(MemoryUserSessionStore::new());
        let store = PersistedSessionStore::new(records.clone());

        let session_id = store.create_session("u1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(store.user_id_for_session(&session_id).await, Some("u1".to_string()));

        assert!(store.destroy_session(&session_id).await.unwrap());
        assert!(records.is_empty());
        assert_eq!(store.user_id_for_session(&session_id).await, None);
        assert!(!store.destroy_session(&session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_records_survive_store_instances() {
        let records = Arc::new(MemoryUserSessionStore::new());
        let session_id = PersistedSessionStore::new(records.clone())
            .create_session("u1")
            .await
            .unwrap();

        let restarted = PersistedSessionStore::new(records);
        assert_eq!(restarted.user_id_for_session(&session_id).await, Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_persisted_expiry() {
        let t0 = Utc::now();
        let records = Arc::new(MemoryUserSessionStore::new());
        records.insert(UserSession::with_created_at("u1", "old", t0 - Duration::seconds(120)));
        records.insert(UserSession::with_created_at("u2", "new", t0 - Duration::seconds(10)));

        let clock = Arc::new(ManualClock::new(t0));
        let store = PersistedSessionStore::new(records.clone())
            .with_expiry(ExpiryPolicy::seconds(60))
            .with_clock(clock);
        assert_eq!(store.user_id_for_session("old").await, None);
        assert_eq!(store.user_id_for_session("new").await, Some("u2".to_string()));

        // Without a duration the stored age is ignored
        let store = PersistedSessionStore::new(records);
        assert_eq!(store.user_id_for_session("old").await, Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_write_failures_are_errors() {
        let inner = MemoryUserSessionStore::new();
        inner.insert(UserSession::new("u1", "sid"));
        let store = PersistedSessionStore::new(Arc::new(ReadOnlyRecords(inner)));

        assert!(matches!(
            store.create_session("u1").await,
            Err(SessionError::Storage(_))
        ));
        assert!(matches!(
            store.destroy_session("sid").await,
            Err(SessionError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_logout_is_not_an_error() {
        let inner = MemoryUserSessionStore::new();
        inner.insert(UserSession::new("u1", "sid"));
        let store = PersistedSessionStore::new(Arc::new(RacingRecords(inner)));

        assert!(!store.destroy_session("sid").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_failures_are_not_found() {
        let store = PersistedSessionStore::new(Arc::new(UnreachableRecords));
        assert_eq!(store.user_id_for_session("sid").await, None);
        assert!(!store.destroy_session("sid").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let records = Arc::new(MemoryUserSessionStore::new());
        let store = PersistedSessionStore::new(records.clone());
        assert!(matches!(
            store.create_session("").await,
            Err(SessionError::MissingUserId)
        ));
        assert!(records.is_empty());
    }
}
