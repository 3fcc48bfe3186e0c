//! # Context Link Tracking
//!
//! Reference-counted deletion protection between shared operator contexts and
//! the API definitions that point at them. A context that is still referenced
//! accepts a deletion request but stays in place until its last reference is
//! removed or retargeted.

pub mod registry;
pub mod state;

pub use registry::ContextRegistry;
pub use state::{LinkEvent, LinkState, Transition};
