use bridge_core::config::WarnLevel;
use bridge_server::AppState;
use std::path::Path;

use super::load_config;

pub fn run(config: Option<&Path>, port: u16, backend_url: Option<String>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("config: {}", w.message),
            WarnLevel::Error => anyhow::bail!("invalid config: {}", w.message),
        }
    }

    let state = AppState::from_config(backend_url, &config);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(bridge_server::serve(state, port))
}
