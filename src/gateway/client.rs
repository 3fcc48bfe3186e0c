//! HTTP client for the gateway management API
//!
//! Keeps the remote `/apis` collection in line with desired state. The client
//! holds no locks and can be shared by concurrent reconciliation workers.

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, trace, warn, Instrument};

use super::collision::{collision_value, find_collision};
use crate::config::GatewayConfig;
use crate::domain::{Definition, MutationResult};
use crate::errors::{GatewayError, Result};
use crate::gateway_span;
use crate::observability::MetricsRecorder;

/// Path of the API definition collection, relative to the gateway base URL
pub const APIS_ENDPOINT: &str = "apis";

/// Join a base URL and path segments with exactly one `/` between parts
pub fn join_url(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for part in parts {
        let part = part.trim_matches('/');
        if !part.is_empty() {
            url.push('/');
            url.push_str(part);
        }
    }
    url
}

/// Authenticated client for the gateway's API definition collection
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    auth: Option<(HeaderName, HeaderValue)>,
    metrics: MetricsRecorder,
}

impl GatewayClient {
    /// Create a new gateway client with the given configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::network(e, "Failed to build HTTP client"))?;

        let auth = if config.secret.is_empty() {
            None
        } else {
            let name = HeaderName::from_bytes(config.auth_header.as_bytes()).map_err(|e| {
                GatewayError::config(format!("Invalid auth header '{}': {}", config.auth_header, e))
            })?;
            let mut value = HeaderValue::from_str(&config.secret)
                .map_err(|e| GatewayError::config(format!("Invalid gateway secret: {}", e)))?;
            value.set_sensitive(true);
            Some((name, value))
        };

        Ok(Self { client, base_url: config.url.clone(), auth, metrics: MetricsRecorder::new() })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.auth {
            Some((name, value)) => builder.header(name.clone(), value.clone()),
            None => builder,
        }
    }

    /// Read the whole remote collection.
    ///
    /// Ordering is whatever the gateway returns and must not be relied upon.
    pub async fn list(&self) -> Result<Vec<Definition>> {
        let result = self.list_inner().instrument(gateway_span!("list")).await;
        self.record("list", &result);
        result
    }

    /// Create `def` after checking it collides with nothing already stored.
    ///
    /// The check is read-then-write: a concurrent create landing between the
    /// list and the POST can still break uniqueness. Returns the key assigned
    /// by the gateway.
    pub async fn create(&self, def: &Definition) -> Result<String> {
        let span = gateway_span!("create", api_id = %def.api_id, listen_path = %def.listen_path());
        let result = self.create_inner(def).instrument(span).await;
        self.record("create", &result);
        result
    }

    /// Replace the stored definition whose `api_id` matches `def.api_id`.
    pub async fn update(&self, def: &Definition) -> Result<()> {
        let span = gateway_span!("update", api_id = %def.api_id, listen_path = %def.listen_path());
        let result = self.update_inner(def).instrument(span).await;
        self.record("update", &result);
        result
    }

    /// Delete by identity, without an existence check and without retrying.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = self.delete_inner(id).instrument(gateway_span!("delete", api_id = %id)).await;
        self.record("delete", &result);
        result
    }

    async fn list_inner(&self) -> Result<Vec<Definition>> {
        let url = join_url(&self.base_url, &[APIS_ENDPOINT]);
        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| GatewayError::network(e, "Failed to list API definitions"))?;

        let body = expect_ok(response).await?;
        let list: Vec<Definition> = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Serialization { source: e, context: "Failed to decode API list".into() }
        })?;

        debug!(count = list.len(), "Listed API definitions");
        Ok(list)
    }

    async fn create_inner(&self, def: &Definition) -> Result<String> {
        let existing = self.list_inner().await?;

        if let Some((field, hit)) = find_collision(&existing, def) {
            self.metrics.record_collision(field.as_str());
            warn!(field = %field, existing_api_id = %hit.api_id, "Refusing to create colliding API");
            return Err(GatewayError::collision(field, collision_value(field, def), &hit.api_id));
        }

        let url = join_url(&self.base_url, &[APIS_ENDPOINT]);
        trace!(body = ?def, "Creating API definition");
        let response = self
            .request(Method::POST, &url)
            .json(def)
            .send()
            .await
            .map_err(|e| GatewayError::network(e, "Failed to create API definition"))?;

        let result = expect_mutation_ok(response).await?;
        debug!(key = %result.key, "API definition created");
        Ok(result.key)
    }

    async fn update_inner(&self, def: &Definition) -> Result<()> {
        let existing = self.list_inner().await?;

        let target = existing
            .iter()
            .find(|api| api.api_id == def.api_id)
            .ok_or_else(|| GatewayError::not_found("api definition", def.api_id.clone()))?;

        let url = join_url(&self.base_url, &[APIS_ENDPOINT, &target.api_id]);
        trace!(body = ?def, "Updating API definition");
        let response = self
            .request(Method::PUT, &url)
            .json(def)
            .send()
            .await
            .map_err(|e| GatewayError::network(e, "Failed to update API definition"))?;

        expect_mutation_ok(response).await?;
        debug!("API definition updated");
        Ok(())
    }

    async fn delete_inner(&self, id: &str) -> Result<()> {
        let url = join_url(&self.base_url, &[APIS_ENDPOINT, id]);
        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| GatewayError::network(e, "Failed to delete API definition"))?;

        expect_ok(response).await?;
        debug!("API definition deleted");
        Ok(())
    }

    fn record<T>(&self, operation: &str, result: &Result<T>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        self.metrics.record_gateway_request(operation, outcome);
    }
}

/// Require HTTP 200 and return the body
async fn expect_ok(response: Response) -> Result<String> {
    let status = response.status();
    debug!("Response status: {}", status);

    let body = response.text().await.unwrap_or_else(|_| "<unable to read body>".to_string());
    if status != StatusCode::OK {
        return Err(GatewayError::status(status.as_u16(), body));
    }

    Ok(body)
}

/// Require HTTP 200 and an `ok` envelope status
async fn expect_mutation_ok(response: Response) -> Result<MutationResult> {
    let body = expect_ok(response).await?;
    let result: MutationResult = serde_json::from_str(&body).map_err(|e| {
        GatewayError::Serialization { source: e, context: format!("Failed to decode response: {}", body) }
    })?;

    if !result.is_ok() {
        return Err(GatewayError::application(result.message));
    }

    Ok(result)
}
