//! Deletion-protection state machine for operator contexts.
//!
//! ```text
//!             link                 delete (links > 0)
//! Unlinked ─────────▶ Linked ─────────────────────▶ PendingDeletion
//!    ▲  │  ◀─────────   (last unlink)                      │
//!    │  │                                                   │ last unlink
//!    │  └───────────── delete (no links) ──────▶ Deleted ◀──┘
//! ```
//!
//! [`OperatorContext::apply`] is the only function that mutates the link set
//! or the state; `Deleted` is terminal.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{OperatorContext, Target};
use crate::errors::{GatewayError, Result};

/// Link state of an operator context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    #[default]
    Unlinked,
    Linked,
    PendingDeletion,
    Deleted,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Unlinked => "unlinked",
            LinkState::Linked => "linked",
            LinkState::PendingDeletion => "pending_deletion",
            LinkState::Deleted => "deleted",
        }
    }

    /// Whether the resource is still externally visible in this state
    pub fn is_retrievable(&self) -> bool {
        !matches!(self, LinkState::Deleted)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent<'a> {
    /// A definition started referencing the context
    Link(&'a Target),
    /// A definition was removed, or its reference was cleared or retargeted
    Unlink(&'a Target),
    /// Someone asked for the context to be deleted
    RequestDeletion,
}

impl LinkEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            LinkEvent::Link(_) => "link",
            LinkEvent::Unlink(_) => "unlink",
            LinkEvent::RequestDeletion => "request_deletion",
        }
    }
}

/// Outcome of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LinkState,
    pub to: LinkState,
    /// The link set actually changed (link of a new, or unlink of a known, definition)
    pub links_changed: bool,
}

impl Transition {
    pub fn state_changed(&self) -> bool {
        self.from != self.to
    }
}

impl OperatorContext {
    /// Apply one event and return the resulting transition.
    ///
    /// Fails with `NotFound` once the context is `Deleted`.
    pub fn apply(&mut self, event: LinkEvent<'_>) -> Result<Transition> {
        let from = self.status.state;
        if from == LinkState::Deleted {
            return Err(GatewayError::not_found("operator context", self.target.to_string()));
        }

        let links = &mut self.status.linked_api_definitions;
        let links_changed = match event {
            LinkEvent::Link(definition) => links.insert(definition.clone()),
            LinkEvent::Unlink(definition) => links.remove(definition),
            LinkEvent::RequestDeletion => {
                if self.status.deletion_requested_at.is_none() {
                    self.status.deletion_requested_at = Some(Utc::now());
                }
                false
            }
        };

        let deletion_requested = self.status.deletion_requested_at.is_some();
        let to = match (deletion_requested, self.status.linked_api_definitions.is_empty()) {
            (false, true) => LinkState::Unlinked,
            (false, false) => LinkState::Linked,
            (true, false) => LinkState::PendingDeletion,
            (true, true) => LinkState::Deleted,
        };
        self.status.state = to;

        Ok(Transition { from, to, links_changed })
    }
}
