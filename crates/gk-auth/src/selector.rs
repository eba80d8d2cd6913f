//! Policy selection from `AUTH_TYPE`

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use gk_core::AuthSettings;
use gk_db::{UserSessionStore, UserStore};

use crate::expiry::ExpiryPolicy;
use crate::policy::AuthPolicy;
use crate::session::{MemorySessionStore, PersistedSessionStore, SessionCookie};

/// Supported authentication types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// No credentials are ever accepted
    Auth,
    BasicAuth,
    SessionAuth,
    SessionExpAuth,
    SessionDbAuth,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Auth => "auth",
            AuthType::BasicAuth => "basic_auth",
            AuthType::SessionAuth => "session_auth",
            AuthType::SessionExpAuth => "session_exp_auth",
            AuthType::SessionDbAuth => "session_db_auth",
        }
    }

    /// Resolve a configured value, falling back to Basic for anything unknown
    pub fn from_setting(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!(auth_type = value, "Unknown AUTH_TYPE, using basic_auth");
            AuthType::BasicAuth
        })
    }

    pub fn uses_sessions(&self) -> bool {
        matches!(
            self,
            AuthType::SessionAuth | AuthType::SessionExpAuth | AuthType::SessionDbAuth
        )
    }

    /// Session lifetime this type enforces for `duration_seconds`
    pub fn session_expiry(&self, duration_seconds: i64) -> ExpiryPolicy {
        match self {
            AuthType::SessionExpAuth | AuthType::SessionDbAuth => {
                ExpiryPolicy::seconds(duration_seconds)
            }
            _ => ExpiryPolicy::never(),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown auth type: {0}")]
pub struct UnknownAuthType(pub String);

impl FromStr for AuthType {
    type Err = UnknownAuthType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(AuthType::Auth),
            "basic_auth" => Ok(AuthType::BasicAuth),
            "session_auth" => Ok(AuthType::SessionAuth),
            "session_exp_auth" => Ok(AuthType::SessionExpAuth),
            "session_db_auth" => Ok(AuthType::SessionDbAuth),
            other => Err(UnknownAuthType(other.to_string())),
        }
    }
}

/// Build the policy named by `settings.auth_type`
pub fn build_policy(
    settings: &AuthSettings,
    users: Arc<dyn UserStore>,
    user_sessions: Arc<dyn UserSessionStore>,
) -> AuthPolicy {
    let auth_type = AuthType::from_setting(&settings.auth_type);
    let expiry = auth_type.session_expiry(settings.session_duration_seconds);

    let policy = match auth_type {
        AuthType::Auth => AuthPolicy::none(),
        AuthType::BasicAuth => AuthPolicy::basic(users),
        AuthType::SessionAuth => AuthPolicy::session(Arc::new(MemorySessionStore::new()), users),
        AuthType::SessionExpAuth => {
            AuthPolicy::session(Arc::new(MemorySessionStore::with_expiry(expiry)), users)
        }
        AuthType::SessionDbAuth => AuthPolicy::session(
            Arc::new(PersistedSessionStore::new(user_sessions).with_expiry(expiry)),
            users,
        ),
    };

    tracing::info!(
        auth_type = %auth_type,
        session_name = %settings.session_name,
        session_duration = settings.session_duration_seconds,
        "Authentication policy selected"
    );
    policy.with_session_name(settings.session_name.clone())
}

/// Cookie carrying ids issued by the policy `settings` selects
pub fn session_cookie(settings: &AuthSettings) -> SessionCookie {
    let auth_type = AuthType::from_setting(&settings.auth_type);
    SessionCookie::new(settings.session_name.clone())
        .with_expiry(auth_type.session_expiry(settings.session_duration_seconds))
}
