//! Domain types shared by the gateway client, the link tracker and the
//! definition sync.

pub mod context;
pub mod definition;
pub mod target;

pub use context::{ContextSpec, ContextStatus, OperatorContext};
pub use definition::{derive_api_id, Definition, MutationResult, Proxy};
pub use target::Target;
