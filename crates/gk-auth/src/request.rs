//! Request abstraction
//!
//! The policies only need a path, header lookup, and cookie lookup. Any HTTP
//! layer can provide them by implementing `AuthRequest`.

use axum::http::{header, HeaderMap, Request};

/// What an authentication policy reads from an incoming request
pub trait AuthRequest {
    /// Request path, without query string
    fn path(&self) -> &str;

    /// Header value by case-insensitive name
    fn header(&self, name: &str) -> Option<&str>;

    /// Cookie value by exact name; empty values count as unset
    fn cookie(&self, name: &str) -> Option<&str>;
}

/// Owned request data, for callers outside axum and for tests
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl RequestParts {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        self.with_header("Cookie", format!("{}={}", name, value))
    }
}

impl AuthRequest for RequestParts {
    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("cookie"))
            .find_map(|(_, v)| cookie_value(v, name))
    }
}

impl AuthRequest for axum::http::request::Parts {
    fn path(&self) -> &str {
        self.uri.path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        cookie_from_headers(&self.headers, name)
    }
}

impl<B> AuthRequest for Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        header_value(self.headers(), name)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        cookie_from_headers(self.headers(), name)
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn cookie_from_headers<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| cookie_value(v, name))
}

/// Extract a cookie value from a `Cookie` header
pub fn cookie_value<'a>(cookie_header: &'a str, cookie_name: &str) -> Option<&'a str> {
    for part in cookie_header.split(';') {
        if let Some((name, value)) = part.trim().split_once('=') {
            if name.trim() == cookie_name {
                let value = value.trim();
                return (!value.is_empty()).then_some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let cookie = "_my_session_id=abc123; other=value";
        assert_eq!(cookie_value(cookie, "_my_session_id"), Some("abc123"));
        assert_eq!(cookie_value(cookie, "other"), Some("value"));
        assert_eq!(cookie_value(cookie, "missing"), None);
        assert_eq!(cookie_value("_my_session_id=", "_my_session_id"), None);
    }

    #[test]
    fn test_request_parts() {
        let request = RequestParts::new("/api/v1/users/me")
            .with_header("Authorization", "Basic QQ==")
            .with_cookie("_my_session_id", "abc");

        assert_eq!(request.path(), "/api/v1/users/me");
        assert_eq!(request.header("authorization"), Some("Basic QQ=="));
        assert_eq!(request.cookie("_my_session_id"), Some("abc"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[test]
    fn test_http_request() {
        let request = Request::builder()
            .uri("/api/v1/status?verbose=1")
            .header("Authorization", "Basic QQ==")
            .header("Cookie", "a=1")
            .header("Cookie", "sid=xyz")
            .body(())
            .unwrap();

        assert_eq!(request.path(), "/api/v1/status");
        assert_eq!(request.header("authorization"), Some("Basic QQ=="));
        assert_eq!(request.cookie("sid"), Some("xyz"));

        let (parts, _) = request.into_parts();
        assert_eq!(parts.cookie("a"), Some("1"));
        assert_eq!(AuthRequest::path(&parts), "/api/v1/status");
    }
}
