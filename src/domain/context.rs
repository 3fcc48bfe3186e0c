//! Operator context domain types
//!
//! An operator context is a shared configuration resource (typically pointing
//! at gateway credentials) that API definitions reference by namespace/name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Target;
use crate::linking::LinkState;

/// Desired state of an operator context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSpec {
    /// Secret holding the gateway credentials; opaque to the link tracker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_secret: Option<Target>,
}

/// Observed state of an operator context
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextStatus {
    /// Definitions currently referencing this context
    #[serde(default)]
    pub linked_api_definitions: BTreeSet<Target>,

    #[serde(default)]
    pub state: LinkState,

    /// When deletion was first requested; set once and never cleared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_requested_at: Option<DateTime<Utc>>,
}

/// A shared context resource together with its link bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorContext {
    pub target: Target,
    pub spec: ContextSpec,
    #[serde(default)]
    pub status: ContextStatus,
}

impl OperatorContext {
    pub fn new(target: Target, spec: ContextSpec) -> Self {
        Self { target, spec, status: ContextStatus::default() }
    }

    pub fn link_count(&self) -> usize {
        self.status.linked_api_definitions.len()
    }

    pub fn is_linked_to(&self, definition: &Target) -> bool {
        self.status.linked_api_definitions.contains(definition)
    }

    pub fn state(&self) -> LinkState {
        self.status.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let mut ctx = OperatorContext::new(
            Target::new("default", "mycontext"),
            ContextSpec { from_secret: Some(Target::new("tyk-operator-system", "tyk-operator-conf")) },
        );
        ctx.status.linked_api_definitions.insert(Target::new("default", "test-http"));

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["spec"]["fromSecret"]["name"], "tyk-operator-conf");
        assert_eq!(json["status"]["linkedApiDefinitions"][0]["name"], "test-http");
        assert_eq!(json["status"]["state"], "unlinked");
        assert!(json["status"].get("deletionRequestedAt").is_none());
    }
}
