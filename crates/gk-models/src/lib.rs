//! # gk-models
//!
//! Domain models for Gatekeeper.
//!
//! `User` is the identity every authentication strategy resolves to;
//! `UserSession` is the persisted binding of a session id to a user.

pub mod password;
pub mod user;
pub mod user_session;

pub use password::{hash_password, verify_password, PasswordError};
pub use user::{NewUser, User};
pub use user_session::UserSession;
