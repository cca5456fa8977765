use bridge_core::types::DEFAULT_METHOD;
use bridge_core::{ActionId, ActionRequest, BridgeResult};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000";
pub const BRIDGE_PATH: &str = "/api/bridge";

const NON_JSON: &str = "Non-JSON response";
const UNREACHABLE: &str = "Backend unreachable";

// ---------------------------------------------------------------------------
// SendOptions
// ---------------------------------------------------------------------------

/// Logical upstream call carried inside the router request.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    payload: Option<Value>,
    method: Option<String>,
    query: BTreeMap<String, String>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    fn into_request(self, action: ActionId) -> ActionRequest {
        let mut request = ActionRequest::new(action);
        if let Some(payload) = self.payload {
            request.payload = payload;
        }
        request.method = self.method.unwrap_or_else(|| DEFAULT_METHOD.to_string());
        request.query = self.query;
        request
    }
}

// ---------------------------------------------------------------------------
// BridgeClient
// ---------------------------------------------------------------------------

/// Sends actions to the router and folds every outcome into a
/// [`BridgeResult`]. `send` has no error path.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    url: String,
}

impl Default for BridgeClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl BridgeClient {
    /// `endpoint` is the router's base address; the bridge path is appended.
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: &str) -> Self {
        Self {
            http,
            url: format!("{}{BRIDGE_PATH}", endpoint.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `{action, payload, method, query}` to the router. The router is
    /// always called with POST; `opts.method` is for the upstream hop.
    pub async fn send(&self, action: &ActionId, opts: SendOptions) -> BridgeResult {
        let request = opts.into_request(action.clone());
        tracing::debug!(action = %action, method = %request.method, "sending bridge request");

        let response = match self.http.post(&self.url).json(&request).send().await {
            Ok(r) => r,
            Err(e) => return BridgeResult::unreachable(e.to_string()),
        };

        let http_status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(b) => serde_json::from_slice::<Value>(&b).ok(),
            Err(_) => None,
        };
        match body {
            Some(json) => normalize(http_status, &json),
            None => BridgeResult::failure(http_status, NON_JSON),
        }
    }
}

/// Fold the router reply into a result. Failure when the HTTP status or the
/// envelope's own `status` is not 2xx, or the envelope does not say `ok: true`.
fn normalize(http_status: u16, json: &Value) -> BridgeResult {
    let envelope_ok = json.get("ok").and_then(Value::as_bool).unwrap_or(false);
    let status = json
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(http_status);

    if !BridgeResult::is_success_status(http_status)
        || !BridgeResult::is_success_status(status)
        || !envelope_ok
    {
        let error = json
            .get("error")
            .and_then(error_text)
            .or_else(|| json.pointer("/data/error").and_then(error_text))
            .unwrap_or_else(|| UNREACHABLE.to_string());
        return BridgeResult::failure(status, error);
    }

    let field = |name: &str| json.get(name).and_then(Value::as_str).map(str::to_string);
    BridgeResult {
        ok: true,
        status,
        action: field("action"),
        path: field("path"),
        url: field("url"),
        data: Some(json.get("data").cloned().unwrap_or(Value::Null)),
        error: None,
    }
}

fn error_text(v: &Value) -> Option<String> {
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
