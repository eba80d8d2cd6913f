//! User repository
//!
//! Postgres-backed `UserStore`.

use async_trait::async_trait;
use gk_models::User;
use sqlx::PgPool;

use crate::repository::{RepositoryResult, UserFilter, UserStore};

/// User repository implementation
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by(&self, filter: &UserFilter) -> RepositoryResult<Vec<User>> {
        // NULL filter fields match everything
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, first_name, last_name, created_at, updated_at
            FROM users
            WHERE ($1::text IS NULL OR email = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(filter.email.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, user: User) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, email, hashed_password, first_name, last_name, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7
            )
            RETURNING id, email, hashed_password, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user_id = %row.id, "User created");
        Ok(row)
    }
}
