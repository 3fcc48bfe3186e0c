//! # Configuration Settings
//!
//! Defines the configuration structure for the gateway operator.

use crate::errors::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// Prefix for layered environment overrides (`GATEWAY_OPERATOR__GATEWAY__URL`, ...)
pub const ENV_PREFIX: &str = "GATEWAY_OPERATOR";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Remote gateway connection settings
    #[validate(nested)]
    pub gateway: GatewayConfig,

    /// Polling budget used when waiting for convergence
    #[validate(nested)]
    pub convergence: ConvergenceConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from an optional file layered under environment overrides
    ///
    /// Precedence, lowest first: built-in defaults, the file at `path` (format
    /// picked from its extension), then `GATEWAY_OPERATOR__<SECTION>__<KEY>`
    /// variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from flat environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            gateway: GatewayConfig::from_env()?,
            convergence: ConvergenceConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(GatewayError::from)?;

        self.validate_custom()?;

        Ok(())
    }

    /// Cross-field rules the validator derive cannot express
    fn validate_custom(&self) -> Result<()> {
        if self.convergence.interval() > self.convergence.timeout() {
            return Err(GatewayError::validation_field(
                "Convergence interval cannot exceed the convergence timeout",
                "convergence.interval_millis",
            ));
        }

        Ok(())
    }
}

/// Remote gateway connection configuration
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the gateway management API (e.g. "http://localhost:8080/tyk")
    #[validate(url(message = "Gateway URL must be a valid URL"))]
    pub url: String,

    /// Shared secret sent with every management request
    pub secret: String,

    /// Header carrying the shared secret
    #[validate(length(min = 1, message = "Auth header cannot be empty"))]
    pub auth_header: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            secret: String::new(),
            auth_header: "x-tyk-authorization".to_string(),
            timeout_seconds: 30,
        }
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .field("auth_header", &self.auth_header)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl GatewayConfig {
    /// Read `GATEWAY_URL`, `GATEWAY_SECRET`, `GATEWAY_AUTH_HEADER` and `GATEWAY_TIMEOUT_SECONDS`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timeout_seconds = match std::env::var("GATEWAY_TIMEOUT_SECONDS") {
            Ok(raw) => raw.parse().map_err(|e| {
                GatewayError::config(format!("Invalid GATEWAY_TIMEOUT_SECONDS '{}': {}", raw, e))
            })?,
            Err(_) => defaults.timeout_seconds,
        };

        Ok(Self {
            url: std::env::var("GATEWAY_URL").unwrap_or(defaults.url),
            secret: std::env::var("GATEWAY_SECRET").unwrap_or(defaults.secret),
            auth_header: std::env::var("GATEWAY_AUTH_HEADER").unwrap_or(defaults.auth_header),
            timeout_seconds,
        })
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Budget for waiting on an eventually-consistent condition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Total time budget in seconds
    #[validate(range(
        min = 1,
        max = 86400,
        message = "Convergence timeout must be between 1 second and 1 day"
    ))]
    pub timeout_seconds: u64,

    /// Delay between attempts in milliseconds
    #[validate(range(min = 1, message = "Convergence interval must be at least 1ms"))]
    pub interval_millis: u64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self { timeout_seconds: 600, interval_millis: 5000 }
    }
}

impl ConvergenceConfig {
    /// Read `CONVERGENCE_TIMEOUT_SECONDS` and `CONVERGENCE_INTERVAL_MILLIS`
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout_seconds: parse_env_u64("CONVERGENCE_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
            interval_millis: parse_env_u64("CONVERGENCE_INTERVAL_MILLIS", defaults.interval_millis)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_millis)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Service name attached to log output
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: crate::APP_NAME.to_string(),
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    /// Read `RUST_LOG` and `LOG_JSON`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: defaults.service_name,
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            json_logging: std::env::var("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.json_logging),
        }
    }
}

fn parse_env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| GatewayError::config(format!("Invalid {} '{}': {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}
