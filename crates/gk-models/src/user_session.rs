//! Persisted session record
//!
//! Table: user_sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binding of a session id to a user, stored outside the process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSession {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self::with_created_at(user_id, session_id, Utc::now())
    }

    /// Build a record with an explicit creation time
    pub fn with_created_at(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            created_at,
            updated_at: created_at,
        }
    }
}
