use bridge_core::resolver::FALLBACK_SUFFIX;
use bridge_core::{ActionId, BridgeResult};
use serde::Serialize;
use serde_json::json;

use crate::client::{BridgeClient, SendOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolStep {
    pub title: &'static str,
    pub detail: String,
}

/// Result of running a tool page's `<tool>.run` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolRun {
    pub action: String,
    pub status: ToolStatus,
    /// Pretty-printed `data` on success, the error message otherwise.
    pub preview: String,
}

/// Walkthrough shown while a tool runs.
pub fn steps(tool: &str) -> Vec<ToolStep> {
    vec![
        ToolStep {
            title: "Prepare",
            detail: format!("Initializing {tool}"),
        },
        ToolStep {
            title: "Call Backend",
            detail: format!("POST /{tool}/run"),
        },
        ToolStep {
            title: "Process",
            detail: "Parsing + executing task".to_string(),
        },
        ToolStep {
            title: "Result",
            detail: "Render video-style walkthrough".to_string(),
        },
    ]
}

/// Send `<tool>.run` with `{tool}` as payload. Bypasses the policy gate: the
/// tool page is an explicit request, not an inferred click.
pub async fn run_tool(client: &BridgeClient, tool: &str) -> ToolRun {
    let tool = tool.trim();
    let tool = if tool.is_empty() { "unknown" } else { tool };
    let raw_action = format!("{tool}{FALLBACK_SUFFIX}");

    let result = match ActionId::new(&raw_action) {
        Ok(action) => {
            client
                .send(&action, SendOptions::new().payload(json!({ "tool": tool })))
                .await
        }
        Err(e) => BridgeResult::failure(0, e.to_string()),
    };

    if result.ok {
        let data = result.data.unwrap_or_default();
        let preview = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
        ToolRun {
            action: raw_action,
            status: ToolStatus::Success,
            preview,
        }
    } else {
        tracing::warn!(action = %raw_action, error = ?result.error, "tool run failed");
        ToolRun {
            action: raw_action,
            status: ToolStatus::Error,
            preview: result.error.unwrap_or_default(),
        }
    }
}
