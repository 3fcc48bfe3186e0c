//! # Gateway Operator
//!
//! Synchronisation and linkage contracts of a Kubernetes operator that manages
//! API definitions in a remote API gateway.
//!
//! ## Architecture
//!
//! ```text
//! reconciler (host) ──▶ DefinitionSync ──▶ GatewayClient ──▶ gateway /apis
//!                             │
//!                             └──────────▶ ContextRegistry (link tracking)
//!
//! tests / reconciler ──▶ ConvergencePoller (wait for eventual consistency)
//! ```
//!
//! ## Core Components
//!
//! - **GatewayClient**: CRUD against the gateway's API definition collection,
//!   refusing creates that would collide on api_id, listen path or slug
//! - **ContextRegistry**: deletion protection for shared operator contexts that
//!   are still referenced by API definitions
//! - **ConvergencePoller**: bounded, cancellable polling of a predicate
//! - **DefinitionSync**: keeps the gateway and the context links in step
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gateway_operator::{Config, GatewayClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_env()?;
//!     let client = GatewayClient::new(&config.gateway)?;
//!     for api in client.list().await? {
//!         println!("{} -> {}", api.api_id, api.proxy.listen_path);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod convergence;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod linking;
pub mod observability;
pub mod reconcile;

// Re-export commonly used types and traits
pub use config::Config;
pub use convergence::{retry_operation, ConvergencePoller};
pub use domain::{Definition, OperatorContext, Target};
pub use errors::{Error, GatewayError, Result};
pub use gateway::{GatewayApi, GatewayClient};
pub use linking::{ContextRegistry, LinkState};
pub use reconcile::DefinitionSync;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
