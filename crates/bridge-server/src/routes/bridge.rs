//! `POST /api/bridge`: the action router.
//!
//! Maps an action id onto an upstream path, forwards the caller's logical
//! method, query and payload, and re-wraps whatever comes back in the
//! `{ok, status, action, path, url, data}` envelope. The upstream's own
//! success/failure classification is passed through untouched.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bridge_core::types::DEFAULT_METHOD;
use bridge_core::{ActionId, BridgeError, BridgeResult};
use reqwest::Url;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// Inbound body after lenient decoding.
#[derive(Debug, PartialEq)]
struct BridgeCall {
    action: ActionId,
    payload: Value,
    method: String,
    query: Vec<(String, String)>,
}

pub async fn bridge(State(app): State<AppState>, method: Method, body: Bytes) -> Response {
    match handle(&app, method, &body).await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::warn!(error = %e.0, "bridge call failed");
            } else {
                tracing::debug!(error = %e.0, %status, "bridge call rejected");
            }
            e.into_response()
        }
    }
}

async fn handle(app: &AppState, method: Method, body: &[u8]) -> Result<Response, AppError> {
    let base = app
        .backend_url
        .as_deref()
        .ok_or_else(|| BridgeError::BackendNotSet(app.backend_var.to_string()))?;

    if method != Method::POST {
        return Err(AppError::method_not_allowed("Use POST"));
    }

    let call = decode_call(body).ok_or_else(|| AppError::bad_request("Missing 'action' string"))?;

    let route = app.routes.resolve(&call.action);
    let url = build_upstream_url(base, &route.path, &call.query)?;
    let upstream_method = parse_method(&call.method)?;

    let mut req = app
        .http_client
        .request(upstream_method.clone(), url.clone())
        .header(reqwest::header::CONTENT_TYPE, "application/json");
    if upstream_method != reqwest::Method::GET {
        req = req.body(serde_json::to_vec(&call.payload)?);
    }

    let upstream = req.send().await?;
    let status = upstream.status().as_u16();
    let text = upstream.text().await?;
    let data = parse_body(&text);

    tracing::info!(
        action = %call.action,
        path = %route.path,
        rule = %route.rule,
        status,
        "bridged action"
    );

    let envelope = BridgeResult {
        ok: BridgeResult::is_success_status(status),
        status,
        action: Some(call.action.to_string()),
        path: Some(route.path),
        url: Some(url.to_string()),
        data: Some(data),
        error: None,
    };
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((code, Json(envelope)).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `None` when the body is not a JSON object with a non-blank string
/// `action`. Everything else has a default.
fn decode_call(body: &[u8]) -> Option<BridgeCall> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let obj = value.as_object()?;
    let action = ActionId::new(obj.get("action")?.as_str()?).ok()?;

    let payload = obj
        .get("payload")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));
    let method = obj
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_METHOD)
        .to_string();
    let query = obj
        .get("query")
        .and_then(Value::as_object)
        .map(|q| {
            q.iter()
                .map(|(k, v)| (k.clone(), coerce_query_value(v)))
                .collect()
        })
        .unwrap_or_default();

    Some(BridgeCall {
        action,
        payload,
        method,
        query,
    })
}

fn coerce_query_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_method(raw: &str) -> Result<reqwest::Method, BridgeError> {
    reqwest::Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| BridgeError::InvalidMethod(raw.to_string()))
}

/// Base (trailing slashes dropped) + path, with each query entry set,
/// replacing any same-named parameter already on the base.
fn build_upstream_url(
    base: &str,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, BridgeError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| BridgeError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if !query.is_empty() {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        for (k, v) in query {
            pairs.retain(|(existing, _)| existing != k);
            pairs.push((k.clone(), v.clone()));
        }
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(url)
}

/// Upstream bodies are not required to be JSON; anything else is kept as
/// `{"raw": text}`.
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw": text }))
}
