use crate::error::{BridgeError, Result};
use crate::resolver::is_fallback_action;
use crate::types::ActionId;
use serde::Serialize;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Disposition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    InProgress,
    Unknown,
}

/// Gate verdict for a resolved action. Both variants swallow the browser
/// default; only `Dispatch` reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", content = "reason", rename_all = "snake_case")]
pub enum Disposition {
    Dispatch,
    Suppress(SuppressReason),
}

impl Disposition {
    pub fn is_dispatch(self) -> bool {
        matches!(self, Disposition::Dispatch)
    }
}

// ---------------------------------------------------------------------------
// PolicySets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PolicySets {
    enabled: BTreeSet<ActionId>,
    in_progress: BTreeSet<ActionId>,
}

impl PolicySets {
    /// Fails if any enabled id sits in the resolver's `.run` fallback
    /// namespace; unrecognized button text must stay a no-op.
    pub fn new(
        enabled: impl IntoIterator<Item = ActionId>,
        in_progress: impl IntoIterator<Item = ActionId>,
    ) -> Result<Self> {
        let enabled: BTreeSet<ActionId> = enabled.into_iter().collect();
        if let Some(bad) = enabled.iter().find(|id| is_fallback_action(id)) {
            return Err(BridgeError::PolicyConflict(bad.to_string()));
        }
        Ok(Self {
            enabled,
            in_progress: in_progress.into_iter().collect(),
        })
    }

    pub fn enabled(&self) -> &BTreeSet<ActionId> {
        &self.enabled
    }

    pub fn in_progress(&self) -> &BTreeSet<ActionId> {
        &self.in_progress
    }

    /// Ids listed in both sets. They are treated as in progress.
    pub fn overlap(&self) -> Vec<&ActionId> {
        self.enabled.intersection(&self.in_progress).collect()
    }

    pub fn decide(&self, action: &ActionId) -> Disposition {
        let disposition = if self.in_progress.contains(action) {
            Disposition::Suppress(SuppressReason::InProgress)
        } else if !self.enabled.contains(action) {
            Disposition::Suppress(SuppressReason::Unknown)
        } else {
            Disposition::Dispatch
        };
        tracing::debug!(action = %action, ?disposition, "policy gate");
        disposition
    }
}

impl Default for PolicySets {
    fn default() -> Self {
        let enabled = ["gmail.send"];
        let in_progress = [
            "slack.post",
            "whatsapp.send",
            "calendar.create",
            "docs.generate",
        ];
        Self {
            enabled: enabled.iter().map(|s| ActionId(s.to_string())).collect(),
            in_progress: in_progress
                .iter()
                .map(|s| ActionId(s.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::fallback_action;

    fn id(s: &str) -> ActionId {
        ActionId::new(s).unwrap()
    }

    #[test]
    fn enabled_action_dispatches() {
        let policy = PolicySets::default();
        assert_eq!(policy.decide(&id("gmail.send")), Disposition::Dispatch);
    }

    #[test]
    fn in_progress_action_is_suppressed() {
        let policy = PolicySets::default();
        assert_eq!(
            policy.decide(&id("slack.post")),
            Disposition::Suppress(SuppressReason::InProgress)
        );
    }

    #[test]
    fn unknown_action_is_suppressed() {
        let policy = PolicySets::default();
        assert_eq!(
            policy.decide(&id("fax.send")),
            Disposition::Suppress(SuppressReason::Unknown)
        );
    }

    #[test]
    fn in_progress_wins_over_enabled() {
        let policy = PolicySets::new([id("slack.post")], [id("slack.post")]).unwrap();
        assert_eq!(
            policy.decide(&id("slack.post")),
            Disposition::Suppress(SuppressReason::InProgress)
        );
        assert_eq!(policy.overlap(), vec![&id("slack.post")]);
    }

    #[test]
    fn fallback_ids_cannot_be_enabled() {
        let err = PolicySets::new([id("export.run")], []).unwrap_err();
        assert!(matches!(err, BridgeError::PolicyConflict(ref a) if a == "export.run"));
    }

    #[test]
    fn fallback_ids_are_always_suppressed() {
        let policy = PolicySets::default();
        for text in ["translate this", "", "?!", "Go"] {
            let action = fallback_action(&text.to_lowercase());
            assert!(!policy.decide(&action).is_dispatch(), "{action} dispatched");
        }
    }

    #[test]
    fn substituted_policy_is_honored() {
        let policy = PolicySets::new([id("slack.post")], []).unwrap();
        assert!(policy.decide(&id("slack.post")).is_dispatch());
        assert!(!policy.decide(&id("gmail.send")).is_dispatch());
    }
}
