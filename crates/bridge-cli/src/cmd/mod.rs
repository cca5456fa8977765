pub mod config;
pub mod resolve;
pub mod route;
pub mod send;
pub mod serve;

use anyhow::Context;
use bridge_core::config::BridgeConfig;
use std::path::Path;

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<BridgeConfig> {
    BridgeConfig::load_or_default(path).with_context(|| match path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to load config".to_string(),
    })
}
