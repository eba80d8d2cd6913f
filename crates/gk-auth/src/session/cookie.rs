//! Session cookie headers

use gk_core::config::DEFAULT_SESSION_NAME;

use crate::expiry::ExpiryPolicy;

const ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

/// `Set-Cookie` values for the session id cookie
///
/// `Max-Age` mirrors the expiry policy of the store that issued the id;
/// ids from non-expiring stores get a browser-session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    expiry: ExpiryPolicy,
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_NAME)
    }
}

impl SessionCookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expiry: ExpiryPolicy::never(),
        }
    }

    pub fn with_expiry(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header value handing `session_id` to the client
    pub fn set_header(&self, session_id: &str) -> String {
        let mut value = format!("{}={}; {}", self.name, session_id, ATTRIBUTES);
        if self.expiry.expires() {
            value.push_str(&format!("; Max-Age={}", self.expiry.duration_seconds()));
        }
        value
    }

    /// Header value telling the client to drop the cookie
    pub fn clear_header(&self) -> String {
        format!("{}=; {}; Max-Age=0", self.name, ATTRIBUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cookie_has_no_lifetime() {
        let header = SessionCookie::default().set_header("abc123");
        assert_eq!(header, "_my_session_id=abc123; Path=/; HttpOnly; SameSite=Lax");
    }

    #[test]
    fn test_lifetime_follows_expiry() {
        let cookie = SessionCookie::new("sid").with_expiry(ExpiryPolicy::seconds(60));
        assert!(cookie.set_header("x").ends_with("; Max-Age=60"));

        let cookie = SessionCookie::new("sid").with_expiry(ExpiryPolicy::seconds(-5));
        assert!(!cookie.set_header("x").contains("Max-Age"));
    }

    #[test]
    fn test_clear_header() {
        let cookie = SessionCookie::new("sid").with_expiry(ExpiryPolicy::seconds(60));
        assert_eq!(cookie.clear_header(), "sid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    }
}
