//! User session repository
//!
//! Postgres-backed `UserSessionStore`.

use async_trait::async_trait;
use gk_models::UserSession;
use sqlx::PgPool;

use crate::repository::{RepositoryError, RepositoryResult, UserSessionStore};

pub struct PgUserSessionRepository {
    pool: PgPool,
}

impl PgUserSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserSessionStore for PgUserSessionRepository {
    async fn create(&self, user_id: &str, session_id: &str) -> RepositoryResult<UserSession> {
        let record = UserSession::new(user_id, session_id);
        let row = sqlx::query_as::<_, UserSession>(
            r#"
            INSERT INTO user_sessions (id, user_id, session_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, session_id, created_at, updated_at
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.session_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_session_id(&self, session_id: &str) -> RepositoryResult<Option<UserSession>> {
        let row = sqlx::query_as::<_, UserSession>(
            r#"
            SELECT id, user_id, session_id, created_at, updated_at
            FROM user_sessions
            WHERE session_id = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, record: &UserSession) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(&record.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "UserSession with id {} not found",
                record.id
            )));
        }

        Ok(())
    }
}
