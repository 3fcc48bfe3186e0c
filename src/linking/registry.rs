//! In-process store of operator contexts and their link sets.
//!
//! Every operation takes the namespace explicitly. Entries are mutated only
//! through [`OperatorContext::apply`]; an entry that reaches `Deleted` is
//! dropped from the map and is no longer retrievable.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use super::state::{LinkEvent, LinkState, Transition};
use crate::context_span;
use crate::domain::{ContextSpec, OperatorContext, Target};
use crate::errors::{GatewayError, Result};
use crate::observability::MetricsRecorder;

const RESOURCE_TYPE: &str = "operator context";

#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: DashMap<Target, OperatorContext>,
    metrics: MetricsRecorder,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new context in `Unlinked` state
    pub fn create(&self, namespace: &str, name: &str, spec: ContextSpec) -> Result<OperatorContext> {
        let _span = context_span!("create", namespace, name).entered();
        let target = Target::new(namespace, name);

        match self.contexts.entry(target.clone()) {
            Entry::Occupied(_) => Err(GatewayError::validation_field(
                format!("{} '{}' already exists", RESOURCE_TYPE, target),
                "name",
            )),
            Entry::Vacant(slot) => {
                let context = OperatorContext::new(target, spec);
                slot.insert(context.clone());
                info!(context = %context.target, "Operator context created");
                Ok(context)
            }
        }
    }

    /// Fetch a snapshot of a context; deleted contexts are not found
    pub fn get(&self, namespace: &str, name: &str) -> Result<OperatorContext> {
        let target = Target::new(namespace, name);
        self.contexts
            .get(&target)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GatewayError::not_found(RESOURCE_TYPE, target.to_string()))
    }

    /// All contexts in a namespace, ordered by name
    pub fn list(&self, namespace: &str) -> Vec<OperatorContext> {
        let mut contexts: Vec<OperatorContext> = self
            .contexts
            .iter()
            .filter(|entry| entry.key().namespace == namespace)
            .map(|entry| entry.value().clone())
            .collect();
        contexts.sort_by(|a, b| a.target.cmp(&b.target));
        contexts
    }

    /// Request deletion.
    ///
    /// Never fails for an existing context: a linked context is only marked
    /// `PendingDeletion` and stays retrievable until its last link goes away.
    pub fn delete(&self, namespace: &str, name: &str) -> Result<LinkState> {
        let _span = context_span!("delete", namespace, name).entered();
        let target = Target::new(namespace, name);
        let transition = self.apply(&target, LinkEvent::RequestDeletion)?;

        if transition.to == LinkState::PendingDeletion {
            let links = self.get(namespace, name).map(|c| c.link_count()).unwrap_or_default();
            info!(
                context = %target,
                linked_api_definitions = links,
                "Operator context still referenced, deletion deferred"
            );
        }

        Ok(transition.to)
    }

    /// Record that `definition` references `context`
    pub fn link(&self, context: &Target, definition: &Target) -> Result<LinkState> {
        let _span = context_span!("link", context.namespace, context.name).entered();
        Ok(self.apply(context, LinkEvent::Link(definition))?.to)
    }

    /// Record that `definition` no longer references `context`.
    ///
    /// Unlinking from a context that is already gone is a no-op reported as
    /// `Deleted`.
    pub fn unlink(&self, context: &Target, definition: &Target) -> Result<LinkState> {
        let _span = context_span!("unlink", context.namespace, context.name).entered();
        match self.apply(context, LinkEvent::Unlink(definition)) {
            Ok(transition) => Ok(transition.to),
            Err(GatewayError::NotFound { .. }) => {
                debug!(context = %context, definition = %definition, "Context already gone");
                Ok(LinkState::Deleted)
            }
            Err(e) => Err(e),
        }
    }

    fn apply(&self, target: &Target, event: LinkEvent<'_>) -> Result<Transition> {
        let transition = {
            let mut entry = self
                .contexts
                .get_mut(target)
                .ok_or_else(|| GatewayError::not_found(RESOURCE_TYPE, target.to_string()))?;
            entry.apply(event)?
        };

        debug!(
            context = %target,
            event = event.name(),
            from = %transition.from,
            to = %transition.to,
            "Applied link event"
        );

        if transition.state_changed() {
            self.metrics.record_context_transition(transition.to.as_str());
        }

        if transition.to == LinkState::Deleted {
            // Deleted entries reject further events, so nothing can race back in.
            self.contexts.remove_if(target, |_, ctx| ctx.state() == LinkState::Deleted);
            info!(context = %target, "Operator context deleted");
        }

        Ok(transition)
    }
}
