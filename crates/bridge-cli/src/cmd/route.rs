use bridge_core::ActionId;
use std::path::Path;

use super::load_config;
use crate::output::print_json;

pub fn run(config: Option<&Path>, action: &str, json: bool) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let action = ActionId::new(action)?;
    let resolved = config.route_table().resolve(&action);

    if json {
        print_json(&serde_json::json!({
            "action": action,
            "path": resolved.path,
            "rule": resolved.rule,
        }))?;
    } else {
        println!("{}  ({})", resolved.path, resolved.rule);
    }
    Ok(())
}
