//! Shared utilities, configuration, and error handling for Orgdesk
//!
//! This crate provides common functionality used across the Orgdesk application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Bearer-token authentication and axum extractors
//! - Request validation helpers

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;

pub use auth::{Actor, ActorRole, AuthUser, AuthVerifier, ReviewerUser};
pub use config::Config;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
