//! Authentication policy
//!
//! An `AuthPolicy` is one of three strategies: no authentication, Basic
//! credentials, or server-side sessions. All of them share the request
//! helpers and `requires_auth`.

use std::sync::Arc;

use gk_core::config::DEFAULT_SESSION_NAME;
use gk_db::UserStore;
use gk_models::User;

use crate::basic::BasicAuth;
use crate::request::AuthRequest;
use crate::session::{SessionError, SessionStore};

const WILDCARD: char = '*';

/// Whether `path` needs authentication given the excluded patterns
///
/// Matching is by containment, not equality: a wildcard entry exempts any
/// path containing the text before its first `*`, and any entry exempts a
/// path that is a substring of it (so `/api/v1/status` is covered by
/// `/api/v1/status/`).
pub fn requires_auth<S: AsRef<str>>(path: &str, excluded: &[S]) -> bool {
    if path.is_empty() || excluded.is_empty() {
        return true;
    }
    for entry in excluded {
        let entry = entry.as_ref();
        if let Some((prefix, _)) = entry.split_once(WILDCARD) {
            if path.contains(prefix) {
                return false;
            }
        }
        if entry.contains(path) {
            return false;
        }
    }
    true
}

/// Session-backed strategy
#[derive(Clone)]
pub struct SessionAuth {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
}

impl SessionAuth {
    pub fn new(store: Arc<dyn SessionStore>, users: Arc<dyn UserStore>) -> Self {
        Self { store, users }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

/// Which strategy a policy runs
#[derive(Clone)]
pub enum AuthKind {
    /// Never identifies anyone
    None,
    Basic(BasicAuth),
    Session(SessionAuth),
}

/// Authentication policy
#[derive(Clone)]
pub struct AuthPolicy {
    kind: AuthKind,
    session_name: String,
}

impl AuthPolicy {
    pub fn new(kind: AuthKind) -> Self {
        Self {
            kind,
            session_name: DEFAULT_SESSION_NAME.to_string(),
        }
    }

    pub fn none() -> Self {
        Self::new(AuthKind::None)
    }

    pub fn basic(users: Arc<dyn UserStore>) -> Self {
        Self::new(AuthKind::Basic(BasicAuth::new(users)))
    }

    pub fn session(store: Arc<dyn SessionStore>, users: Arc<dyn UserStore>) -> Self {
        Self::new(AuthKind::Session(SessionAuth::new(store, users)))
    }

    /// Cookie name carrying the session id
    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }

    pub fn kind(&self) -> &AuthKind {
        &self.kind
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn uses_sessions(&self) -> bool {
        matches!(self.kind, AuthKind::Session(_))
    }

    /// Raw `Authorization` header value; empty counts as absent
    pub fn authorization_header<'r, R: AuthRequest>(&self, request: Option<&'r R>) -> Option<&'r str> {
        request?.header("authorization").filter(|h| !h.is_empty())
    }

    /// Value of the session cookie
    pub fn session_cookie<'r, R: AuthRequest>(&self, request: Option<&'r R>) -> Option<&'r str> {
        request?.cookie(&self.session_name)
    }

    /// Identify the requester, if the strategy can
    pub async fn current_user<R: AuthRequest>(&self, request: Option<&R>) -> Option<User> {
        match &self.kind {
            AuthKind::None => None,
            AuthKind::Basic(basic) => basic.current_user(self.authorization_header(request)).await,
            AuthKind::Session(session) => {
                let session_id = self.session_cookie(request)?;
                let user_id = session.store.user_id_for_session(session_id).await?;
                match session.users.find_by_id(&user_id).await {
                    Ok(user) => user,
                    Err(e) => {
                        tracing::warn!(user_id = %user_id, error = %e, "User lookup failed for session");
                        None
                    }
                }
            }
        }
    }

    /// Open a session for `user_id`
    ///
    /// `Ok(None)` when the policy has no sessions or the user id is empty.
    pub async fn create_session(&self, user_id: &str) -> Result<Option<String>, SessionError> {
        let AuthKind::Session(session) = &self.kind else {
            return Ok(None);
        };
        match session.store.create_session(user_id).await {
            Ok(session_id) => Ok(Some(session_id)),
            Err(SessionError::MissingUserId) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        let AuthKind::Session(session) = &self.kind else {
            return None;
        };
        session.store.user_id_for_session(session_id?).await
    }

    /// End the session named by the request's cookie
    pub async fn destroy_session<R: AuthRequest>(&self, request: Option<&R>) -> Result<bool, SessionError> {
        let AuthKind::Session(session) = &self.kind else {
            return Ok(false);
        };
        match self.session_cookie(request) {
            Some(session_id) => session.store.destroy_session(session_id).await,
            None => Ok(false),
        }
    }
}
