//! # Error Types
//!
//! Error taxonomy for the gateway operator using `thiserror`.

use std::fmt;

/// Custom result type for gateway operator operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway operator
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// Transport failure reaching the remote gateway
    #[error("Network error: {context}")]
    Network {
        #[source]
        source: reqwest::Error,
        context: String,
    },

    /// Unexpected HTTP status on an otherwise successful transport call
    #[error("Gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Client-side uniqueness pre-check rejected a create before any remote mutation
    #[error("API collision on {field}: '{value}' is already used by API '{existing_api_id}'")]
    Collision { field: CollisionField, value: String, existing_api_id: String },

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Remote envelope reported a non-success status despite HTTP 200
    #[error("Gateway request completed, but with error: {message}")]
    Application { message: String },

    /// A polled condition never held within the allotted time
    #[error("Condition '{label}' not met after {attempts} attempts in {elapsed_ms}ms: {last_reason}")]
    ConvergenceTimeout { label: String, elapsed_ms: u64, attempts: u32, last_reason: String },

    /// A polled wait was aborted by its caller
    #[error("Wait for '{label}' was cancelled: {last_reason}")]
    Cancelled { label: String, last_reason: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },
}

/// Identity field that caused a create-time collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionField {
    ApiId,
    ListenPath,
    Slug,
}

impl CollisionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionField::ApiId => "api_id",
            CollisionField::ListenPath => "listen_path",
            CollisionField::Slug => "slug",
        }
    }
}

impl fmt::Display for CollisionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GatewayError {
    /// Create a network error with context
    pub fn network<S: Into<String>>(source: reqwest::Error, context: S) -> Self {
        Self::Network { source, context: context.into() }
    }

    /// Create an unexpected-status error
    pub fn status<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Status { status, body: body.into() }
    }

    /// Create a collision error
    pub fn collision<V: Into<String>, I: Into<String>>(
        field: CollisionField,
        value: V,
        existing_api_id: I,
    ) -> Self {
        Self::Collision { field, value: value.into(), existing_api_id: existing_api_id.into() }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create an application-level error from a response envelope
    pub fn application<S: Into<String>>(message: S) -> Self {
        Self::Application { message: message.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Check if this error is transient and the caller may retry
    ///
    /// Collisions, missing resources and application-level rejections describe a
    /// conflict in desired state and need user intervention instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network { .. } => true,
            GatewayError::Status { .. } => true,
            GatewayError::ConvergenceTimeout { .. } => true,
            _ => false,
        }
    }

    /// Short machine-readable label, used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network { .. } => "network",
            GatewayError::Status { .. } => "status",
            GatewayError::Collision { .. } => "collision",
            GatewayError::NotFound { .. } => "not_found",
            GatewayError::Application { .. } => "application",
            GatewayError::ConvergenceTimeout { .. } => "timeout",
            GatewayError::Cancelled { .. } => "cancelled",
            GatewayError::Config { .. } => "config",
            GatewayError::Serialization { .. } => "serialization",
            GatewayError::Validation { .. } => "validation",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error, "Gateway request failed")
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<config::ConfigError> for GatewayError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_validation_messages("", &errors, &mut messages);
        Self::validation(format!("Validation failed: {}", messages.join("; ")))
    }
}

/// Flatten nested validation errors into `path: message` entries
fn collect_validation_messages(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<String>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path =
            if prefix.is_empty() { field.to_string() } else { format!("{}.{}", prefix, field) };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                out.push(format!("{}: {}", path, error_messages.join(", ")));
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_messages(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_messages(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_message_names_field() {
        let error = GatewayError::collision(CollisionField::ListenPath, "/httpbin", "abc123");
        assert!(matches!(error, GatewayError::Collision { .. }));
        assert_eq!(
            error.to_string(),
            "API collision on listen_path: '/httpbin' is already used by API 'abc123'"
        );
    }

    #[test]
    fn test_application_error_carries_message() {
        let error = GatewayError::application("Invalid API definition");
        assert_eq!(
            error.to_string(),
            "Gateway request completed, but with error: Invalid API definition"
        );
    }

    #[test]
    fn test_validation_error() {
        let error = GatewayError::validation_field("must not be empty", "url");
        if let GatewayError::Validation { field, .. } = error {
            assert_eq!(field, Some("url".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_retryable_errors() {
        assert!(GatewayError::status(502, "bad gateway").is_retryable());
        assert!(GatewayError::ConvergenceTimeout {
            label: "test".into(),
            elapsed_ms: 10,
            attempts: 2,
            last_reason: "not yet".into(),
        }
        .is_retryable());
        assert!(!GatewayError::collision(CollisionField::ApiId, "a", "a").is_retryable());
        assert!(!GatewayError::not_found("api", "missing").is_retryable());
        assert!(!GatewayError::application("nope").is_retryable());
        assert!(!GatewayError::Cancelled { label: "t".into(), last_reason: "r".into() }
            .is_retryable());
    }

    #[test]
    fn test_error_conversions() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: GatewayError = json_error.into();
        assert!(matches!(error, GatewayError::Serialization { .. }));
        assert_eq!(error.kind(), "serialization");
    }

    #[test]
    fn test_collision_field_display() {
        assert_eq!(CollisionField::ApiId.to_string(), "api_id");
        assert_eq!(CollisionField::ListenPath.to_string(), "listen_path");
        assert_eq!(CollisionField::Slug.to_string(), "slug");
    }
}
