//! # Definition Sync
//!
//! The contract a reconciler upholds when an API definition resource changes:
//! push the definition to the gateway and keep the referenced operator
//! context's link set in step. Watching, queueing and requeue backoff belong
//! to the host controller and are not handled here.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{derive_api_id, Definition, Target};
use crate::errors::{GatewayError, Result};
use crate::gateway::GatewayApi;
use crate::linking::ContextRegistry;

/// What was last pushed for one definition resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDefinition {
    /// Identity of the record in the gateway
    pub remote_id: String,
    /// Context the definition was linked to, with its namespace resolved
    pub context: Option<Target>,
}

/// Applies and removes API definition resources
pub struct DefinitionSync<G> {
    gateway: G,
    contexts: Arc<ContextRegistry>,
    applied: DashMap<Target, AppliedDefinition>,
}

impl<G: GatewayApi> DefinitionSync<G> {
    pub fn new(gateway: G, contexts: Arc<ContextRegistry>) -> Self {
        Self { gateway, contexts, applied: DashMap::new() }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn contexts(&self) -> &Arc<ContextRegistry> {
        &self.contexts
    }

    /// Last applied state of the resource `owner`, if any
    pub fn applied(&self, owner: &Target) -> Option<AppliedDefinition> {
        self.applied.get(owner).map(|entry| entry.value().clone())
    }

    /// Push the desired state of the definition resource `owner`.
    ///
    /// An empty `api_id` is derived from `owner`, and a context reference
    /// without a namespace resolves to the owner's namespace. The referenced
    /// context must exist. An existing record is updated, otherwise one is
    /// created (subject to the collision check). Returns the gateway identity.
    ///
    /// Once the gateway accepted the push the record is remembered even if
    /// linking fails afterwards, so [`remove`](Self::remove) still deletes it.
    pub async fn apply(&self, owner: &Target, mut spec: Definition) -> Result<String> {
        if spec.api_id.is_empty() {
            spec.api_id = derive_api_id(owner);
        }

        if let Some(context) = spec.context.as_mut() {
            if context.namespace.is_empty() {
                context.namespace = owner.namespace.clone();
            }
            self.contexts.get(&context.namespace, &context.name)?;
        }

        let remote_id = match self.gateway.update(&spec).await {
            Ok(()) => {
                debug!(owner = %owner, api_id = %spec.api_id, "Updated existing API definition");
                spec.api_id.clone()
            }
            Err(GatewayError::NotFound { .. }) => {
                let key = self.gateway.create(&spec).await?;
                info!(owner = %owner, api_id = %spec.api_id, key = %key, "Created API definition");
                if key.is_empty() {
                    spec.api_id.clone()
                } else {
                    key
                }
            }
            Err(e) => return Err(e),
        };

        // Record the push before any link bookkeeping so a later remove can
        // always find the remote record. The previous context stays linked
        // until the new link has been taken.
        let previous = self.applied(owner).and_then(|a| a.context);
        self.applied.insert(
            owner.clone(),
            AppliedDefinition { remote_id: remote_id.clone(), context: previous.clone() },
        );

        if let Some(context) = spec.context.as_ref() {
            self.contexts.link(context, owner)?;
        }
        self.applied.insert(
            owner.clone(),
            AppliedDefinition { remote_id: remote_id.clone(), context: spec.context.clone() },
        );

        if let Some(prev) = previous.as_ref().filter(|prev| Some(*prev) != spec.context.as_ref()) {
            let state = self.contexts.unlink(prev, owner)?;
            info!(owner = %owner, context = %prev, state = %state, "Unlinked operator context");
        }

        Ok(remote_id)
    }

    /// Delete the definition resource `owner` from the gateway and drop its
    /// context link. Unknown owners are a no-op.
    pub async fn remove(&self, owner: &Target) -> Result<()> {
        let Some(applied) = self.applied(owner) else {
            debug!(owner = %owner, "Nothing applied for definition, skipping removal");
            return Ok(());
        };

        self.gateway.delete(&applied.remote_id).await?;
        self.applied.remove(owner);

        if let Some(context) = applied.context.as_ref() {
            let state = self.contexts.unlink(context, owner)?;
            info!(owner = %owner, context = %context, state = %state, "Unlinked operator context");
        }

        info!(owner = %owner, api_id = %applied.remote_id, "Removed API definition");
        Ok(())
    }
}
