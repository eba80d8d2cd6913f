//! Shared application state

use std::sync::Arc;

use gk_auth::{build_policy, session_cookie, AuthPolicy, Authenticator, SessionCookie};
use gk_core::AppConfig;
use gk_db::{
    Database, MemoryUserSessionStore, MemoryUserStore, PgUserRepository, PgUserSessionRepository,
    UserSessionStore, UserStore,
};

use crate::health::HealthChecker;

pub struct AppState {
    pub config: AppConfig,
    pub users: Arc<dyn UserStore>,
    pub policy: Arc<AuthPolicy>,
    pub authenticator: Authenticator,
    pub cookie: SessionCookie,
    pub health: Arc<HealthChecker>,
}

impl AppState {
    /// Wire the policy to the given stores
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        user_sessions: Arc<dyn UserSessionStore>,
    ) -> Self {
        let policy = Arc::new(build_policy(&config.auth, users.clone(), user_sessions));
        let authenticator =
            Authenticator::new(policy.clone()).with_excluded_paths(config.auth.excluded_paths.clone());
        let cookie = session_cookie(&config.auth);
        let health = Arc::new(HealthChecker::new(config.auth.auth_type.clone()));

        Self {
            config,
            users,
            policy,
            authenticator,
            cookie,
            health,
        }
    }

    /// Postgres-backed stores when a database is available, memory otherwise
    pub fn from_database(config: AppConfig, database: Option<Database>) -> Self {
        match database {
            Some(database) => {
                let users = Arc::new(PgUserRepository::new(database.pool().clone()));
                let sessions = Arc::new(PgUserSessionRepository::new(database.pool().clone()));
                let mut state = Self::new(config, users, sessions);
                state.health = Arc::new(
                    HealthChecker::new(state.config.auth.auth_type.clone()).with_database(database),
                );
                state
            }
            None => Self::new(
                config,
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryUserSessionStore::new()),
            ),
        }
    }
}
