//! # Configuration Management
//!
//! Gateway connection, convergence budget and observability settings, loaded
//! from flat environment variables or from a layered file + environment source.

pub mod settings;

pub use settings::{AppConfig, ConvergenceConfig, GatewayConfig, ObservabilityConfig, ENV_PREFIX};

/// Application configuration
pub type Config = AppConfig;
