//! Click → action → gate → backend.
//!
//! [`ActionBridge::handle_click`] is what a page-wide click listener calls.
//! Nothing here produces user-facing feedback: suppressed and failed actions
//! are visible only in logs.

use bridge_core::policy::SuppressReason;
use bridge_core::{ActionId, ActionNode, BridgeResult, Disposition, PolicySets, Resolver};
use serde_json::json;

use crate::client::{BridgeClient, SendOptions};

// ---------------------------------------------------------------------------
// ClickEvent
// ---------------------------------------------------------------------------

/// The parts of a UI click event the bridge reads or writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub default_prevented: bool,
    pub meta_key: bool,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub alt_key: bool,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn has_modifier(&self) -> bool {
        self.meta_key || self.ctrl_key || self.shift_key || self.alt_key
    }
}

// ---------------------------------------------------------------------------
// ClickOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Not ours: already handled, modified click, ignore zone, or nothing
    /// actionable. The browser default proceeds.
    Passthrough,
    /// Resolved but gated off. Default prevented, no network call.
    Suppressed {
        action: ActionId,
        reason: SuppressReason,
    },
    /// Sent exactly once. `result` may still be a failure.
    Dispatched {
        action: ActionId,
        result: BridgeResult,
    },
}

// ---------------------------------------------------------------------------
// ActionBridge
// ---------------------------------------------------------------------------

pub struct ActionBridge {
    resolver: Resolver,
    policy: PolicySets,
    client: BridgeClient,
}

impl ActionBridge {
    pub fn new(resolver: Resolver, policy: PolicySets, client: BridgeClient) -> Self {
        Self {
            resolver,
            policy,
            client,
        }
    }

    /// Dispatched actions always run as a dry run from the multi-channel UI.
    fn dispatch_options() -> SendOptions {
        SendOptions::new()
            .payload(json!({ "ui": "multi-channel", "dry_run": true }))
            .method("POST")
            .query("dry_run", "1")
    }

    pub async fn handle_click<N: ActionNode>(
        &self,
        event: &mut ClickEvent,
        target: N,
    ) -> ClickOutcome {
        if event.default_prevented || event.has_modifier() {
            return ClickOutcome::Passthrough;
        }

        let Some(action) = self.resolver.resolve(target) else {
            return ClickOutcome::Passthrough;
        };

        match self.policy.decide(&action) {
            Disposition::Suppress(reason) => {
                event.prevent_default();
                ClickOutcome::Suppressed { action, reason }
            }
            Disposition::Dispatch => {
                event.prevent_default();
                let result = self.client.send(&action, Self::dispatch_options()).await;
                if !result.ok {
                    tracing::warn!(
                        action = %action,
                        status = result.status,
                        error = result.error.as_deref().unwrap_or(""),
                        "backend call failed"
                    );
                }
                ClickOutcome::Dispatched { action, result }
            }
        }
    }
}
