use crate::error::Result;
use crate::policy::PolicySets;
use crate::resolver::{is_fallback_action, KeywordTable, Resolver};
use crate::route::{default_aliases, RouteAlias, RouteTable};
use crate::types::ActionId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the upstream backend base address.
pub const BACKEND_URL_VAR: &str = "BRIDGE_BACKEND_URL";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// BridgeConfig
// ---------------------------------------------------------------------------

/// Static tables for the pipeline. Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub keywords: KeywordTable,
    #[serde(default = "default_enabled")]
    pub enabled: Vec<ActionId>,
    #[serde(default = "default_in_progress")]
    pub in_progress: Vec<ActionId>,
    #[serde(default = "default_aliases")]
    pub routes: Vec<RouteAlias>,
}

fn default_enabled() -> Vec<ActionId> {
    PolicySets::default().enabled().iter().cloned().collect()
}

fn default_in_progress() -> Vec<ActionId> {
    PolicySets::default().in_progress().iter().cloned().collect()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordTable::default(),
            enabled: default_enabled(),
            in_progress: default_in_progress(),
            routes: default_aliases(),
        }
    }
}

impl BridgeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: BridgeConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.keywords.clone())
    }

    pub fn policy(&self) -> Result<PolicySets> {
        PolicySets::new(self.enabled.iter().cloned(), self.in_progress.iter().cloned())
    }

    pub fn route_table(&self) -> RouteTable {
        RouteTable::from_aliases(&self.routes)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for id in self.enabled.iter().filter(|id| is_fallback_action(id)) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("enabled action '{id}' collides with the '.run' fallback namespace"),
            });
        }

        for id in self.enabled.iter().filter(|id| self.in_progress.contains(id)) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("action '{id}' is both enabled and in progress; it will be suppressed"),
            });
        }

        for (later, earlier) in self.keywords.shadowed() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("keyword '{later}' can never match: '{earlier}' is listed first"),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for route in &self.routes {
            if !seen.insert(&route.action) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("duplicate route for '{}'; the first entry wins", route.action),
                });
            }
        }

        warnings
    }
}
