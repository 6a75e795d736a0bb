//! Transport tests: bytes in, framed JSON-RPC out.
//!
//! Stdio runs against in-memory readers and a duplex pipe; the HTTP router
//! (feature `sse`) is driven with `tower::ServiceExt::oneshot`.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::AsyncReadExt;

use agentic_context::ContextConfig;
use agentic_context_mcp::catalog::build_dispatcher;
use agentic_context_mcp::protocol::ProtocolHandler;
use agentic_context_mcp::transport::StdioTransport;

fn handler() -> ProtocolHandler {
    let dispatcher = build_dispatcher(ContextConfig::with_timeout(Duration::from_secs(5))).unwrap();
    ProtocolHandler::new(dispatcher)
}

fn line(msg: Value) -> Vec<u8> {
    let mut bytes = serde_json::to_vec(&msg).unwrap();
    bytes.push(b'\n');
    bytes
}

fn ping(id: i64) -> Vec<u8> {
    line(json!({"jsonrpc": "2.0", "id": id, "method": "ping"}))
}

fn wait_call(id: i64, millis: u64) -> Vec<u8> {
    line(json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": "wait", "arguments": {"millis": millis}}
    }))
}

/// Serve `reader` to EOF and collect every response line in write order.
async fn serve_stdio<R>(reader: R) -> Vec<Value>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let transport = StdioTransport::new(handler());
    let (server_out, mut client_in) = tokio::io::duplex(64 * 1024);
    transport.serve(reader, server_out).await.unwrap();

    let mut out = String::new();
    client_in.read_to_string(&mut out).await.unwrap();
    out.lines()
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad line {l:?}: {e}")))
        .collect()
}

fn by_id(responses: &[Value], id: Value) -> &Value {
    responses
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("no response with id {id} in {responses:?}"))
}

// ─────────────────────── stdio ───────────────────────

#[tokio::test]
async fn stdio_non_utf8_line_gets_parse_error_and_serving_continues() {
    let mut input = ping(1);
    input.extend_from_slice(b"\xff\xfe\n");
    input.extend(ping(2));

    let responses = serve_stdio(input.as_slice()).await;
    assert_eq!(responses.len(), 3, "{responses:?}");

    assert_eq!(by_id(&responses, json!(1))["result"], json!({}));
    assert_eq!(by_id(&responses, json!(2))["result"], json!({}));
    let err = by_id(&responses, Value::Null);
    assert_eq!(err["error"]["code"], -32700);
    assert_eq!(err["error"]["data"]["kind"], "parse_error");
}

#[tokio::test]
async fn stdio_slow_call_does_not_block_ping() {
    let mut input = wait_call(1, 300);
    input.extend(ping(2));

    let responses = serve_stdio(input.as_slice()).await;
    let order: Vec<&Value> = responses.iter().map(|r| &r["id"]).collect();
    assert_eq!(order, vec![&json!(2), &json!(1)]);
    assert_eq!(responses[1]["result"]["structuredContent"]["requested_ms"], 300);
}

#[tokio::test]
async fn stdio_blank_lines_and_notifications_produce_nothing() {
    let mut input = b"\n   \n".to_vec();
    input.extend(line(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})));
    input.extend(ping(9));

    let responses = serve_stdio(input.as_slice()).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 9);
}

#[tokio::test]
async fn stdio_read_failure_still_flushes_in_flight_responses() {
    let reader = tokio_test::io::Builder::new()
        .read(&wait_call(1, 100))
        .read_error(std::io::Error::new(std::io::ErrorKind::Other, "pipe closed"))
        .build();

    let responses = serve_stdio(tokio::io::BufReader::new(reader)).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 1);
    assert!(responses[0]["result"]["isError"].is_null());
}

// ─────────────────────── http ───────────────────────

#[cfg(feature = "sse")]
mod http {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use agentic_context_mcp::transport::SseTransport;

    fn router(token: Option<&str>) -> Router {
        SseTransport::with_token(handler(), token.map(str::to_string)).router()
    }

    fn post() -> axum::http::request::Builder {
        Request::builder().method("POST").uri("/mcp")
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let resp = app.oneshot(request).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, content_type, body)
    }

    #[tokio::test]
    async fn malformed_body_is_json_rpc_parse_error() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"#;
        let request = post()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        let (status, content_type, body) = call(router(None), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body["id"], Value::Null);
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["error"]["data"]["kind"], "parse_error");
    }

    #[tokio::test]
    async fn missing_content_type_is_still_served() {
        let raw = r#"{"jsonrpc":"2.0","id":4,"method":"ping"}"#;
        let request = post().body(Body::from(raw)).unwrap();
        let (status, _, body) = call(router(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 4);
        assert_eq!(body["result"], json!({}));
    }

    #[tokio::test]
    async fn notification_is_accepted_without_body() {
        let raw = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        let request = post()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        let (status, _, body) = call(router(None), request).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn token_guards_mcp_but_not_health() {
        let app = router(Some("s3cret"));
        let raw = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;

        let denied = post().body(Body::from(raw)).unwrap();
        let (status, _, body) = call(app.clone(), denied).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["data"]["kind"], "unauthorized");

        let allowed = post()
            .header(header::AUTHORIZATION, "Bearer s3cret")
            .body(Body::from(raw))
            .unwrap();
        let (status, _, body) = call(app.clone(), allowed).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["tools"].as_array().map(Vec::len), Some(3));

        let health = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = call(app, health).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["tools"], 3);
        assert_eq!(body["resources"], 5);
        assert_eq!(body["prompts"], 2);
    }
}
