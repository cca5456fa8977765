use bridge_core::tree::{ElementTree, ACTION_ATTR, IGNORE_ATTR};
use bridge_core::{Disposition, SuppressReason};
use std::path::Path;

use super::load_config;
use crate::output::print_json;

/// Build a one-button page from the flags and run it through the resolver
/// and the policy gate.
pub fn run(
    config: Option<&Path>,
    text: &str,
    action: Option<&str>,
    ignored: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let resolver = config.resolver();
    let policy = config.policy()?;

    let mut tree = ElementTree::new();
    let mut parent = tree.root();
    if ignored {
        parent = tree.append(parent, "section");
        tree.set_attr(parent, IGNORE_ATTR, "true");
    }
    let button = tree.append(parent, "button");
    tree.set_text(button, text);
    if let Some(a) = action {
        tree.set_attr(button, ACTION_ATTR, a);
    }

    let resolved = resolver.resolve(tree.node(button));
    let verdict = resolved.as_ref().map(|a| policy.decide(a));

    if json {
        return print_json(&serde_json::json!({
            "action": resolved,
            "verdict": verdict,
        }));
    }

    match (resolved, verdict) {
        (Some(action), Some(verdict)) => println!("{action}  {}", describe(verdict)),
        _ => println!("(no action: browser default)"),
    }
    Ok(())
}

fn describe(verdict: Disposition) -> &'static str {
    match verdict {
        Disposition::Dispatch => "dispatch",
        Disposition::Suppress(SuppressReason::InProgress) => "suppressed (in progress)",
        Disposition::Suppress(SuppressReason::Unknown) => "suppressed (unknown)",
    }
}
