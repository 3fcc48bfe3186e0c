//! # Metrics Collection
//!
//! Counters for gateway calls, collisions, context transitions and convergence
//! attempts. Recording is a no-op until the embedding process installs a
//! `metrics` recorder.

use metrics::{counter, describe_counter};

/// Register metric descriptions with whatever recorder is installed
pub fn describe_metrics() {
    describe_counter!("gateway_requests_total", "Gateway management calls by operation and outcome");
    describe_counter!("gateway_collisions_total", "Creates rejected by the uniqueness pre-check");
    describe_counter!("context_transitions_total", "Operator context link-state transitions");
    describe_counter!("convergence_attempts_total", "Predicate evaluations made by the poller");
}

/// Metrics recorder that tracks operator metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Record a gateway management call
    pub fn record_gateway_request(&self, operation: &str, outcome: &str) {
        let labels = [("operation", operation.to_string()), ("outcome", outcome.to_string())];
        counter!("gateway_requests_total", &labels).increment(1);
    }

    /// Record a create rejected before any remote mutation
    pub fn record_collision(&self, field: &str) {
        let labels = [("field", field.to_string())];
        counter!("gateway_collisions_total", &labels).increment(1);
    }

    /// Record a context moving into a new link state
    pub fn record_context_transition(&self, to: &str) {
        let labels = [("to", to.to_string())];
        counter!("context_transitions_total", &labels).increment(1);
    }

    /// Record one predicate evaluation
    pub fn record_convergence_attempt(&self, satisfied: bool) {
        let outcome = if satisfied { "satisfied" } else { "pending" };
        let labels = [("outcome", outcome.to_string())];
        counter!("convergence_attempts_total", &labels).increment(1);
    }
}
