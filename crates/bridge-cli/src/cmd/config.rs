use bridge_core::config::WarnLevel;
use clap::Subcommand;
use std::path::Path;

use super::load_config;
use crate::output::{print_json, print_table};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (defaults merged with the file)
    Show,

    /// List route rules in match order
    Routes,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(config: Option<&Path>, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Routes => routes(config, json),
        ConfigSubcommand::Validate => validate(config, json),
    }
}

fn show(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(path)?;
    if json {
        print_json(&config)
    } else {
        print!("{}", serde_yaml::to_string(&config)?);
        Ok(())
    }
}

fn routes(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let table = config.route_table();
    let rules: Vec<&str> = table.rules().collect();

    if json {
        return print_json(&serde_json::json!({ "rules": rules }));
    }

    let paths = config.routes.iter().map(|r| r.path.clone());
    let rows = rules
        .iter()
        .zip(paths.chain(std::iter::once("/<a>/<b>/...".to_string())))
        .enumerate()
        .map(|(i, (rule, path))| vec![(i + 1).to_string(), rule.to_string(), path])
        .collect();
    print_table(&["#", "RULE", "PATH"], rows);
    Ok(())
}

fn validate(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
