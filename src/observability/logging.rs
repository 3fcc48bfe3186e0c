//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! In JSON logging mode every span field (operation, api_id, namespace, ...)
//! is emitted alongside the event, which makes it possible to follow one
//! definition through list/create/update calls in a log pipeline.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{GatewayError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Create a tracing span for a gateway management call.
///
/// ```rust,ignore
/// let span = gateway_span!("create", api_id = %def.api_id);
/// ```
#[macro_export]
macro_rules! gateway_span {
    ($operation:expr) => {
        tracing::info_span!(
            "gateway_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::info_span!(
            "gateway_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for a context link-tracking operation.
#[macro_export]
macro_rules! context_span {
    ($operation:expr, $namespace:expr, $name:expr) => {
        tracing::debug_span!(
            "context_operation",
            operation = %$operation,
            namespace = %$namespace,
            name = %$name
        )
    };
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level when set. Installing twice is
/// not an error: the first subscriber stays in place.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            GatewayError::config(format!("Invalid log level '{}': {}", config.log_level, e))
        })?;

    // A subscriber may already be set elsewhere (e.g. integration tests); keep it.
    let _ = if config.json_logging {
        tracing::subscriber::set_global_default(
            fmt().json().with_env_filter(filter).with_current_span(true).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(fmt().with_env_filter(filter).finish())
    };

    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        service_name = %config.observability.service_name,
        gateway_url = %config.gateway.url,
        auth_header = %config.gateway.auth_header,
        secret_configured = !config.gateway.secret.is_empty(),
        request_timeout_seconds = config.gateway.timeout_seconds,
        convergence_timeout_seconds = config.convergence.timeout_seconds,
        convergence_interval_millis = config.convergence.interval_millis,
        "Gateway operator configuration"
    );
}
