//! Integration tests for configuration management
//!
//! These tests validate that configuration is read from flat environment
//! variables, from a file, and from prefixed environment overrides layered on
//! top of that file.

use gateway_operator::config::AppConfig;
use gateway_operator::{Config, GatewayError, Result};
use std::env;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tracing_test::traced_test;

// Use a mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const FLAT_VARS: &[&str] = &[
    "GATEWAY_URL",
    "GATEWAY_SECRET",
    "GATEWAY_AUTH_HEADER",
    "GATEWAY_TIMEOUT_SECONDS",
    "CONVERGENCE_TIMEOUT_SECONDS",
    "CONVERGENCE_INTERVAL_MILLIS",
];

const LAYERED_VARS: &[&str] =
    &["GATEWAY_OPERATOR__GATEWAY__URL", "GATEWAY_OPERATOR__CONVERGENCE__TIMEOUT_SECONDS"];

/// Snapshot of environment variables, restored on drop
struct EnvSnapshot(Vec<(&'static str, Option<String>)>);

impl EnvSnapshot {
    fn take(keys: &[&'static str]) -> Self {
        let saved = keys.iter().map(|key| (*key, env::var(key).ok())).collect();
        for key in keys {
            env::remove_var(key);
        }
        Self(saved)
    }
}

impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        for (key, value) in &self.0 {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}

/// Test that configuration properly reads environment variables
#[test]
fn test_config_environment_integration() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let _env = EnvSnapshot::take(FLAT_VARS);

    env::set_var("GATEWAY_URL", "http://gateway.local:8080/tyk");
    env::set_var("GATEWAY_SECRET", "s3cr3t");
    env::set_var("GATEWAY_TIMEOUT_SECONDS", "15");
    env::set_var("CONVERGENCE_TIMEOUT_SECONDS", "60");
    env::set_var("CONVERGENCE_INTERVAL_MILLIS", "250");

    let config = Config::from_env()?;
    assert_eq!(config.gateway.url, "http://gateway.local:8080/tyk");
    assert_eq!(config.gateway.secret, "s3cr3t");
    assert_eq!(config.gateway.timeout(), Duration::from_secs(15));
    assert_eq!(config.convergence.timeout(), Duration::from_secs(60));
    assert_eq!(config.convergence.interval(), Duration::from_millis(250));

    // Test with invalid timeout
    env::set_var("GATEWAY_TIMEOUT_SECONDS", "invalid");
    let result = Config::from_env();
    assert!(matches!(result, Err(GatewayError::Config { .. })));

    Ok(())
}

/// Test that configuration defaults work when no environment variables are set
#[test]
fn test_config_defaults_integration() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let _env = EnvSnapshot::take(FLAT_VARS);

    let config = Config::from_env()?;
    assert_eq!(config.gateway.url, "http://localhost:8080");
    assert!(config.gateway.secret.is_empty());
    assert_eq!(config.gateway.auth_header, "x-tyk-authorization");
    assert_eq!(config.convergence.timeout(), Duration::from_secs(600));
    assert_eq!(config.convergence.interval(), Duration::from_secs(5));

    Ok(())
}

/// Interval longer than the total budget is rejected at load time
#[test]
fn test_config_rejects_interval_beyond_timeout() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let _env = EnvSnapshot::take(FLAT_VARS);

    env::set_var("CONVERGENCE_TIMEOUT_SECONDS", "1");
    env::set_var("CONVERGENCE_INTERVAL_MILLIS", "5000");

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, GatewayError::Validation { .. }));
}

/// File values sit under prefixed environment overrides
#[test]
fn test_config_file_with_env_overrides() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let _env = EnvSnapshot::take(LAYERED_VARS);

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[gateway]
url = "http://from-file:8080"
secret = "file-secret"

[convergence]
timeout_seconds = 120
interval_millis = 1000
"#
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path()))?;
    assert_eq!(config.gateway.url, "http://from-file:8080");
    assert_eq!(config.gateway.secret, "file-secret");
    assert_eq!(config.convergence.timeout_seconds, 120);

    env::set_var("GATEWAY_OPERATOR__GATEWAY__URL", "http://from-env:9090");
    env::set_var("GATEWAY_OPERATOR__CONVERGENCE__TIMEOUT_SECONDS", "30");

    let config = AppConfig::load(Some(file.path()))?;
    assert_eq!(config.gateway.url, "http://from-env:9090");
    assert_eq!(config.gateway.secret, "file-secret");
    assert_eq!(config.convergence.timeout_seconds, 30);
    assert_eq!(config.convergence.interval_millis, 1000);

    Ok(())
}

/// A missing config file is an error rather than a silent fallback
#[test]
fn test_config_missing_file_is_error() {
    let _guard = ENV_MUTEX.lock().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = AppConfig::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, GatewayError::Config { .. }));
}

/// Test that configuration summary is logged without the secret
#[traced_test]
#[test]
fn test_config_logging_redacts_secret() {
    let mut config = AppConfig::default();
    config.gateway.secret = "do-not-print".to_string();

    gateway_operator::observability::log_config_info(&config);

    assert!(logs_contain("Gateway operator configuration"));
    assert!(logs_contain("secret_configured=true"));
    assert!(!logs_contain("do-not-print"));
}
