//! In-memory stores
//!
//! Used when no database is configured and throughout the test suites.
//! Records keep insertion order so "first match" is well defined.

use async_trait::async_trait;
use gk_models::{User, UserSession};
use parking_lot::RwLock;

use crate::repository::{
    RepositoryError, RepositoryResult, UserFilter, UserSessionStore, UserStore,
};

/// In-memory user store
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with users
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.id == user.id) {
            return Err(RepositoryError::Conflict(format!(
                "User with id {} already exists",
                user.id
            )));
        }
        users.push(user.clone());
        Ok(user)
    }
}

/// In-memory persisted-session store
#[derive(Default)]
pub struct MemoryUserSessionStore {
    records: RwLock<Vec<UserSession>>,
}

impl MemoryUserSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully built record, keeping its timestamps
    pub fn insert(&self, record: UserSession) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl UserSessionStore for MemoryUserSessionStore {
    async fn create(&self, user_id: &str, session_id: &str) -> RepositoryResult<UserSession> {
        let record = UserSession::new(user_id, session_id);
        self.records.write().push(record.clone());
        Ok(record)
    }

    async fn find_by_session_id(&self, session_id: &str) -> RepositoryResult<Option<UserSession>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| r.session_id == session_id)
            .cloned())
    }

    async fn delete(&self, record: &UserSession) -> RepositoryResult<()> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != record.id);
        if records.len() == before {
            return Err(RepositoryError::NotFound(format!(
                "UserSession with id {} not found",
                record.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_keeps_insertion_order() {
        let first = User::new("dup@example.com", "one").unwrap();
        let second = User::new("dup@example.com", "two").unwrap();
        let store = MemoryUserStore::with_users([first.clone(), second]);

        let found = store.find_by(&UserFilter::email("dup@example.com")).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first.id);
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let store = MemoryUserStore::new();
        let user = User::new("bob@example.com", "pw").unwrap();
        store.create(user.clone()).await.unwrap();

        assert_eq!(store.find_by_id(&user.id).await.unwrap().unwrap().email, "bob@example.com");
        assert!(store.find_by_id("missing").await.unwrap().is_none());
        assert!(matches!(
            store.create(user).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_session_records() {
        let store = MemoryUserSessionStore::new();
        let record = store.create("u1", "s1").await.unwrap();

        let found = store.find_by_session_id("s1").await.unwrap().unwrap();
        assert_eq!(found.user_id, "u1");

        store.delete(&record).await.unwrap();
        assert!(store.find_by_session_id("s1").await.unwrap().is_none());
        assert!(store.delete(&record).await.is_err());
    }
}
