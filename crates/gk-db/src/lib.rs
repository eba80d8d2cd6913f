//! # gk-db
//!
//! Storage layer for Gatekeeper.
//!
//! - Repository traits the authentication policies depend on
//!   (`UserStore`, `UserSessionStore`)
//! - In-memory implementations for single-process deployments and tests
//! - PostgreSQL implementations using SQLx, plus pool management
//!
//! ## Example
//!
//! ```ignore
//! use gk_db::{Database, DatabaseConfig, PgUserRepository, UserFilter, UserStore};
//!
//! let db = Database::connect(&DatabaseConfig::with_url(url)).await?;
//! let users = PgUserRepository::new(db.pool().clone());
//! let matches = users.find_by(&UserFilter::email("bob@example.com")).await?;
//! ```

pub mod memory;
pub mod pool;
pub mod repository;
pub mod user_sessions;
pub mod users;

// Re-exports
pub use memory::{MemoryUserSessionStore, MemoryUserStore};
pub use pool::{Database, DatabaseConfig};
pub use repository::{
    RepositoryError, RepositoryResult, UserFilter, UserSessionStore, UserStore,
};
pub use user_sessions::PgUserSessionRepository;
pub use users::PgUserRepository;
