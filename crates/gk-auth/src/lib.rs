//! # gk-auth
//!
//! Authentication policies for Gatekeeper.
//!
//! ## Features
//!
//! - Path exclusion with wildcard prefixes (`requires_auth`)
//! - HTTP Basic authentication against a `UserStore`
//! - Session authentication: in-memory, expiring, and database-backed
//! - `Authenticator` gate turning a request into an `AuthDecision`

pub mod basic;
pub mod expiry;
pub mod middleware;
pub mod policy;
pub mod request;
pub mod selector;
pub mod session;

pub use basic::BasicAuth;
pub use expiry::{Clock, ExpiryPolicy, ManualClock, SystemClock};
pub use middleware::{AuthDecision, Authenticator};
pub use policy::{requires_auth, AuthKind, AuthPolicy, SessionAuth};
pub use request::{AuthRequest, RequestParts};
pub use selector::{build_policy, session_cookie, AuthType};
pub use session::{
    generate_session_id, MemorySessionStore, PersistedSessionStore, SessionCookie,
    SessionEntry, SessionError, SessionStore,
};
