//! # Error Handling
//!
//! Typed failures for the gateway client, the context link tracker and the
//! convergence poller. None of them are swallowed; callers decide what to retry
//! via [`GatewayError::is_retryable`].

pub mod types;

pub use types::{CollisionField, GatewayError, Result};

/// Crate-wide alias kept for call sites that prefer the short name
pub type Error = GatewayError;
