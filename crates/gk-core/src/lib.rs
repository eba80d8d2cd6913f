//! # gk-core
//!
//! Core types shared by every Gatekeeper crate:
//! - Common error type and result alias
//! - Configuration loaded from the process environment

pub mod config;
pub mod error;

pub use config::{AppConfig, AuthSettings, ConfigError};
pub use error::*;
