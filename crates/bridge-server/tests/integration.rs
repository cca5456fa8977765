use axum::http::StatusCode;
use bridge_core::RouteTable;
use bridge_server::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app(backend: Option<&str>) -> axum::Router {
    bridge_server::build_router(AppState::new(
        backend.map(str::to_string),
        RouteTable::default(),
    ))
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn call(
    app: axum::Router,
    http_method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(http_method).uri(uri);
    let body = match body {
        Some(b) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(serde_json::to_vec(&b).unwrap())
        }
        None => axum::body::Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_bridge(app: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    call(app, "POST", "/api/bridge", Some(body)).await
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_backend_is_a_500_configuration_error() {
    let (status, json) = post_bridge(app(None), json!({"action": "gmail.send"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "BRIDGE_BACKEND_URL is not set");
}

#[tokio::test]
async fn missing_backend_is_reported_before_method_check() {
    let (status, _) = call(app(None), "GET", "/api/bridge", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn non_post_is_rejected_with_405() {
    let (status, json) = call(app(Some("http://127.0.0.1:9")), "GET", "/api/bridge", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json, json!({"ok": false, "error": "Use POST"}));
}

#[tokio::test]
async fn missing_action_is_rejected_with_400() {
    let (status, json) = post_bridge(app(Some("http://127.0.0.1:9")), json!({"payload": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing 'action' string");
}

#[tokio::test]
async fn non_string_action_is_rejected_with_400() {
    let (status, _) = post_bridge(app(Some("http://127.0.0.1:9")), json!({"action": ["gmail"]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_body_is_rejected_with_400() {
    let (status, _) = call(app(Some("http://127.0.0.1:9")), "POST", "/api/bridge", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_does_not_need_backend() {
    let (status, json) = call(app(None), "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
}

// ---------------------------------------------------------------------------
// Proxying
// ---------------------------------------------------------------------------

#[tokio::test]
async fn table_action_is_proxied_with_query_and_payload() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gmail/send"))
        .and(query_param("dry_run", "1"))
        .and(body_json(json!({"to": "a@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m-1"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, json) = post_bridge(
        app(Some(&upstream.uri())),
        json!({
            "action": "gmail.send",
            "payload": {"to": "a@example.com"},
            "query": {"dry_run": "1"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["status"], 200);
    assert_eq!(json["action"], "gmail.send");
    assert_eq!(json["path"], "/gmail/send");
    assert_eq!(json["url"], format!("{}/gmail/send?dry_run=1", upstream.uri()));
    assert_eq!(json["data"], json!({"id": "m-1"}));
}

#[tokio::test]
async fn unlisted_action_uses_dotted_path() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/foo/bar/baz"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"done": true})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, json) = post_bridge(app(Some(&upstream.uri())), json!({"action": "foo.bar.baz"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["path"], "/foo/bar/baz");
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn get_never_forwards_a_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inbox/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, _) = post_bridge(
        app(Some(&upstream.uri())),
        json!({"action": "inbox.list", "method": "GET", "payload": {"ignored": true}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn lowercase_method_is_honored() {
    let upstream = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/calendar/create"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, _) = post_bridge(
        app(Some(&upstream.uri())),
        json!({"action": "calendar.create", "method": "put"}),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn plain_text_upstream_is_wrapped_as_raw() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/slack/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain"))
        .mount(&upstream)
        .await;

    let (status, json) = post_bridge(app(Some(&upstream.uri())), json!({"action": "slack.post"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"], json!({"raw": "plain"}));
}

#[tokio::test]
async fn plain_text_error_keeps_upstream_classification() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/slack/post"))
        .respond_with(ResponseTemplate::new(503).set_body_string("plain"))
        .mount(&upstream)
        .await;

    let (status, json) = post_bridge(app(Some(&upstream.uri())), json!({"action": "slack.post"})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["ok"], false);
    assert_eq!(json["status"], 503);
    assert_eq!(json["data"], json!({"raw": "plain"}));
}

#[tokio::test]
async fn upstream_json_error_is_passed_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gmail/send"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "bad recipient"})))
        .mount(&upstream)
        .await;

    let (status, json) = post_bridge(app(Some(&upstream.uri())), json!({"action": "gmail.send"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["ok"], false);
    assert_eq!(json["data"]["error"], "bad recipient");
}

#[tokio::test]
async fn unreachable_upstream_is_a_500() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (status, json) = post_bridge(
        app(Some(&format!("http://127.0.0.1:{port}"))),
        json!({"action": "gmail.send"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn invalid_upstream_method_is_a_500() {
    let (status, json) = post_bridge(
        app(Some("http://127.0.0.1:9")),
        json!({"action": "gmail.send", "method": "NOT VALID"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn configured_alias_redirects_legacy_name() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gmail/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&upstream)
        .await;

    let config: bridge_core::config::BridgeConfig =
        serde_json::from_value(json!({"routes": [{"action": "mail.send", "path": "/gmail/send"}]}))
            .unwrap();
    let router = bridge_server::build_router(AppState::from_config(Some(upstream.uri()), &config));
    let (status, json) = post_bridge(router, json!({"action": "mail.send"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["path"], "/gmail/send");
}
