//! Repository traits
//!
//! The authentication policies only see these traits; the Postgres and
//! in-memory implementations are interchangeable behind them.

use async_trait::async_trait;
use gk_core::GkError;
use gk_models::{User, UserSession};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for GkError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => GkError::not_found("Entity", "key", what),
            RepositoryError::Conflict(msg) => GkError::bad_request(msg),
            other => GkError::Database(other.to_string()),
        }
    }
}

/// Search criteria for users
///
/// Every `Some` field must match; an empty filter matches every user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub email: Option<String>,
}

impl UserFilter {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.email.as_deref().map_or(true, |email| user.email == email)
    }
}

/// User lookup collaborator
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find every user matching the filter, in insertion order
    async fn find_by(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>>;

    /// Find a user by id
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;

    /// Store a new user
    async fn create(&self, user: User) -> RepositoryResult<User>;
}

/// Persisted session-record collaborator
#[async_trait]
pub trait UserSessionStore: Send + Sync {
    /// Persist a new binding of `session_id` to `user_id`
    async fn create(&self, user_id: &str, session_id: &str) -> RepositoryResult<UserSession>;

    /// Find the first record carrying `session_id`
    async fn find_by_session_id(&self, session_id: &str) -> RepositoryResult<Option<UserSession>>;

    /// Delete a record
    async fn delete(&self, record: &UserSession) -> RepositoryResult<()>;
}
