//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod fake_gateway;

use gateway_operator::config::GatewayConfig;

pub const TEST_SECRET: &str = "test-secret";

/// Gateway configuration pointing at `url` with the shared test secret
pub fn gateway_config(url: &str) -> GatewayConfig {
    GatewayConfig { url: url.to_string(), secret: TEST_SECRET.to_string(), ..Default::default() }
}
