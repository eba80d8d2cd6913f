//! Authentication gate
//!
//! Runs before every request: decides whether the path is gated, then turns
//! the policy's answer into a typed decision the HTTP layer renders.

use std::sync::Arc;

use gk_core::config::default_excluded_paths;
use gk_core::GkError;
use gk_models::User;

use crate::policy::{requires_auth, AuthPolicy};
use crate::request::AuthRequest;

/// Outcome of the gate for one request
#[derive(Debug, Clone)]
pub enum AuthDecision {
    /// Path is excluded; the user is attached when the request identified one
    Exempt(Option<User>),
    /// Credentials resolved to a user
    Authenticated(User),
    /// No credentials at all
    Unauthorized,
    /// Credentials present but not accepted
    Forbidden,
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Exempt(_) | AuthDecision::Authenticated(_))
    }

    /// The user to attach to the request, if any
    pub fn into_user(self) -> Option<User> {
        match self {
            AuthDecision::Exempt(user) => user,
            AuthDecision::Authenticated(user) => Some(user),
            AuthDecision::Unauthorized | AuthDecision::Forbidden => None,
        }
    }

    /// Rejection as an application error
    pub fn into_result(self) -> Result<Option<User>, GkError> {
        match self {
            AuthDecision::Unauthorized => Err(GkError::unauthorized("Unauthorized")),
            AuthDecision::Forbidden => Err(GkError::forbidden("Forbidden")),
            allowed => Ok(allowed.into_user()),
        }
    }
}

/// Authenticator for validating requests
#[derive(Clone)]
pub struct Authenticator {
    policy: Arc<AuthPolicy>,
    excluded_paths: Vec<String>,
}

impl Authenticator {
    /// Create a new authenticator with the default excluded paths
    pub fn new(policy: Arc<AuthPolicy>) -> Self {
        Self {
            policy,
            excluded_paths: default_excluded_paths(),
        }
    }

    pub fn with_excluded_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths = paths;
        self
    }

    pub fn policy(&self) -> &Arc<AuthPolicy> {
        &self.policy
    }

    pub fn excluded_paths(&self) -> &[String] {
        &self.excluded_paths
    }

    /// Decide whether `request` may proceed
    pub async fn authorize<R: AuthRequest>(&self, request: &R) -> AuthDecision {
        let user = self.policy.current_user(Some(request)).await;

        if !requires_auth(request.path(), &self.excluded_paths) {
            return AuthDecision::Exempt(user);
        }

        let has_header = self.policy.authorization_header(Some(request)).is_some();
        let has_cookie = self.policy.session_cookie(Some(request)).is_some();
        if !has_header && !has_cookie {
            tracing::debug!(path = request.path(), "No credentials on gated path");
            return AuthDecision::Unauthorized;
        }

        match user {
            Some(user) => AuthDecision::Authenticated(user),
            None => {
                tracing::debug!(path = request.path(), "Credentials rejected");
                AuthDecision::Forbidden
            }
        }
    }
}
