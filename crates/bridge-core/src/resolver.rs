use crate::types::ActionId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ActionNode
// ---------------------------------------------------------------------------

/// A node in some UI tree that a click can land on.
///
/// The resolver only ever moves upward, so implementors need a parent link
/// and the three annotations read at each step: ignore marker, explicit
/// action override, and whether the node is button-like.
pub trait ActionNode: Sized {
    fn parent(&self) -> Option<Self>;

    /// True when the node is marked `data-ignore-actions="true"`.
    fn ignores_actions(&self) -> bool;

    /// Raw `data-action` value, untrimmed. `None` when absent.
    fn action_override(&self) -> Option<String>;

    /// `<button>` or `role="button"`.
    fn is_clickable(&self) -> bool;

    /// Visible text of the node and its descendants.
    fn text(&self) -> String;
}

// ---------------------------------------------------------------------------
// KeywordTable
// ---------------------------------------------------------------------------

/// Ordered keyword → action pairs. The first keyword found in the text wins,
/// so order is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable(Vec<KeywordEntry>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub action: ActionId,
}

impl KeywordTable {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.0
    }

    /// First entry whose keyword occurs in `lowered`. Keywords are compared
    /// lower-cased.
    pub fn lookup(&self, lowered: &str) -> Option<&ActionId> {
        self.0
            .iter()
            .find(|e| lowered.contains(&e.keyword.to_lowercase()))
            .map(|e| &e.action)
    }

    /// Pairs `(later, earlier)` where `earlier` is a substring of `later`:
    /// any text containing `later` is claimed by `earlier` first, so `later`
    /// can never match.
    pub fn shadowed(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (i, later) in self.0.iter().enumerate() {
            let later_kw = later.keyword.to_lowercase();
            if let Some(earlier) = self.0[..i]
                .iter()
                .find(|e| later_kw.contains(&e.keyword.to_lowercase()))
            {
                out.push((later.keyword.clone(), earlier.keyword.clone()));
            }
        }
        out
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        let pairs = [
            ("gmail", "gmail.send"),
            ("mail", "gmail.send"),
            ("slack", "slack.post"),
            ("whatsapp", "whatsapp.send"),
            ("calendar", "calendar.create"),
            ("docs", "docs.generate"),
        ];
        Self(
            pairs
                .into_iter()
                .map(|(keyword, action)| KeywordEntry {
                    keyword: keyword.to_string(),
                    action: ActionId(action.to_string()),
                })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Fallback ids
// ---------------------------------------------------------------------------

pub const FALLBACK_SUFFIX: &str = ".run";
const FALLBACK_WORD: &str = "tool";

static NON_WORD_RE: OnceLock<Regex> = OnceLock::new();

fn non_word_re() -> &'static Regex {
    NON_WORD_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap())
}

/// `"<first word>.run"`, with non-word characters stripped from the word.
/// A word that strips to nothing (`"!!! go"`) uses the `tool` placeholder
/// too, so the id is never a bare `.run`.
pub fn fallback_action(lowered: &str) -> ActionId {
    let first = lowered.split_whitespace().next().unwrap_or("");
    let word = non_word_re().replace_all(first, "");
    let word = if word.is_empty() {
        FALLBACK_WORD
    } else {
        word.as_ref()
    };
    ActionId(format!("{word}{FALLBACK_SUFFIX}"))
}

/// True for ids in the namespace [`fallback_action`] produces.
pub fn is_fallback_action(id: &ActionId) -> bool {
    id.as_str().ends_with(FALLBACK_SUFFIX)
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    keywords: KeywordTable,
}

impl Resolver {
    pub fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Walk from `target` toward the root and return the node that decides
    /// the action, or `None` if an ignore zone is hit first or nothing on
    /// the way is actionable.
    pub fn nearest_actionable<N: ActionNode>(&self, target: N) -> Option<N> {
        let mut current = Some(target);
        while let Some(node) = current {
            if node.ignores_actions() {
                return None;
            }
            if node.action_override().is_some_and(|a| !a.is_empty()) {
                return Some(node);
            }
            if node.is_clickable() {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Action for an already-chosen node: trimmed override first, then
    /// keyword inference over the visible text, then the `.run` fallback.
    pub fn infer<N: ActionNode>(&self, node: &N) -> ActionId {
        if let Some(explicit) = node.action_override() {
            if let Ok(id) = ActionId::new(&explicit) {
                return id;
            }
        }
        let lowered = node.text().to_lowercase();
        match self.keywords.lookup(&lowered) {
            Some(id) => id.clone(),
            None => fallback_action(&lowered),
        }
    }

    pub fn resolve<N: ActionNode>(&self, target: N) -> Option<ActionId> {
        let node = self.nearest_actionable(target)?;
        let action = self.infer(&node);
        tracing::debug!(action = %action, "resolved click target");
        Some(action)
    }
}
