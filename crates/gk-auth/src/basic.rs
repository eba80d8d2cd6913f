//! Basic Authentication
//!
//! Decodes `Authorization: Basic <base64(email:password)>` and checks the
//! credentials against the user store. Every failure, malformed or missing,
//! comes back as `None`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use gk_db::{UserFilter, UserStore};
use gk_models::User;

const BASIC_PREFIX: &str = "Basic ";

/// Token part of a Basic `Authorization` header
///
/// The scheme match is exact and case-sensitive.
pub fn extract_token(header: Option<&str>) -> Option<&str> {
    header
        .filter(|h| !h.is_empty())
        .and_then(|h| h.strip_prefix(BASIC_PREFIX))
}

/// Strict base64 decode into UTF-8
pub fn decode_token(token: Option<&str>) -> Option<String> {
    let token = token.filter(|t| !t.is_empty())?;
    let bytes = STANDARD.decode(token).ok()?;
    String::from_utf8(bytes).ok()
}

/// Split `username:password` on the first colon
///
/// The password may itself contain colons.
pub fn split_credentials(decoded: Option<&str>) -> Option<(&str, &str)> {
    decoded?.split_once(':')
}

/// Look up the user by email and check the password
///
/// Only the first matching user is considered, even if several share the
/// email.
pub async fn resolve_identity(
    users: &dyn UserStore,
    username: Option<&str>,
    password: Option<&str>,
) -> Option<User> {
    let username = username.filter(|u| !u.is_empty())?;
    let password = password.filter(|p| !p.is_empty())?;

    let matches = match users.find_by(&UserFilter::email(username)).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "User lookup failed during basic auth");
            return None;
        }
    };

    let user = matches.into_iter().next()?;
    if user.check_password(password) {
        Some(user)
    } else {
        tracing::debug!(user_id = %user.id, "Basic auth password mismatch");
        None
    }
}

/// Basic authentication strategy
#[derive(Clone)]
pub struct BasicAuth {
    users: Arc<dyn UserStore>,
}

impl BasicAuth {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Resolve the user named by an `Authorization` header value
    pub async fn current_user(&self, header: Option<&str>) -> Option<User> {
        let token = extract_token(header);
        let decoded = decode_token(token);
        let (username, password) = split_credentials(decoded.as_deref())?;
        resolve_identity(self.users.as_ref(), Some(username), Some(password)).await
    }
}
