//! Core error types for Gatekeeper
//!
//! Every layer converts its own failures into `GkError` before they reach the
//! HTTP boundary, where `status_code` picks the response status.

use thiserror::Error;

/// Core error type for all Gatekeeper operations
#[derive(Error, Debug)]
pub enum GkError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GkError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        GkError::NotFound {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        GkError::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        GkError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        GkError::Forbidden {
            message: message.into(),
        }
    }

    /// HTTP status code mapping
    pub fn status_code(&self) -> u16 {
        match self {
            GkError::NotFound { .. } => 404,
            GkError::BadRequest { .. } => 400,
            GkError::Unauthorized { .. } => 401,
            GkError::Forbidden { .. } => 403,
            GkError::Database(_)
            | GkError::Session(_)
            | GkError::Internal(_) => 500,
        }
    }
}
