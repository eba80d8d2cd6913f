//! Session Authentication
//!
//! A `SessionStore` binds opaque session ids to user ids. The in-memory store
//! covers plain and expiring sessions; the persisted store delegates to a
//! `UserSessionStore`.

mod cookie;
mod memory;
mod persisted;

pub use cookie::SessionCookie;
pub use memory::{MemorySessionStore, SessionEntry};
pub use persisted::PersistedSessionStore;

use async_trait::async_trait;
use gk_core::GkError;
use gk_db::RepositoryError;
use rand::distr::Alphanumeric;
use rand::Rng;
use thiserror::Error;

/// Characters in a generated session id
pub const SESSION_ID_LEN: usize = 64;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("User id is required to create a session")]
    MissingUserId,
    #[error("Session storage failed: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<SessionError> for GkError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingUserId => GkError::bad_request(err.to_string()),
            SessionError::Storage(e) => GkError::Session(e.to_string()),
        }
    }
}

/// Where session id to user id bindings live
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issue a fresh session id bound to `user_id`
    async fn create_session(&self, user_id: &str) -> Result<String, SessionError>;

    /// User bound to `session_id`, if the session exists and is still valid
    ///
    /// Lookup failures are reported as `None`.
    async fn user_id_for_session(&self, session_id: &str) -> Option<String>;

    /// Remove the session; `false` when there was nothing valid to remove
    async fn destroy_session(&self, session_id: &str) -> Result<bool, SessionError>;
}

/// Fresh alphanumeric session id from the thread-local CSPRNG
pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Leading characters of a session id, safe to log
pub(crate) fn id_prefix(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}
