use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ActionId
// ---------------------------------------------------------------------------

/// Opaque `domain.verb` token naming a backend operation, e.g. `gmail.send`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionId(pub(crate) String);

impl ActionId {
    /// Build an id from raw text. Surrounding whitespace is dropped; an empty
    /// result is rejected.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BridgeError::InvalidActionId(raw.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `a.b.c` → `/a/b/c`.
    pub fn dotted_path(&self) -> String {
        format!("/{}", self.0.replace('.', "/"))
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActionId {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ActionId> for String {
    fn from(id: ActionId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ActionId {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// ActionRequest
// ---------------------------------------------------------------------------

pub const DEFAULT_METHOD: &str = "POST";

/// Body posted to `/api/bridge`. The `method`, `query` and `payload` describe
/// the upstream call the router should make, not the call to the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionId,
    #[serde(default = "empty_object")]
    pub payload: serde_json::Value,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

impl ActionRequest {
    pub fn new(action: ActionId) -> Self {
        Self {
            action,
            payload: empty_object(),
            method: default_method(),
            query: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// BridgeResult
// ---------------------------------------------------------------------------

/// Normalized outcome of a bridged call.
///
/// The router fills `action`, `path` and `url` on every proxied call; the
/// client leaves them as the router sent them. Status `0` means the router
/// was never reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResult {
    pub ok: bool,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResult {
    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            action: None,
            path: None,
            url: None,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Never-reached-the-router failure.
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self::failure(0, error)
    }

    pub fn is_success_status(status: u16) -> bool {
        (200..300).contains(&status)
    }

    pub fn reached_router(&self) -> bool {
        self.status != 0
    }
}
