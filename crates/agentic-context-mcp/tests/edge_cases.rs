//! Edge case integration tests for agentic-context-mcp.
//!
//! Drives the bundled catalog through `ProtocolHandler` exactly as a client
//! would: protocol errors, validation, tool failures, resource matching,
//! prompt expansion, timeouts and concurrency.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use agentic_context::ContextConfig;
use agentic_context_mcp::catalog::build_dispatcher;
use agentic_context_mcp::protocol::ProtocolHandler;
use agentic_context_mcp::transport::framing;
use agentic_context_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

/// Handler over the bundled catalog with the given execution bound.
fn handler_with_timeout(timeout: Duration) -> ProtocolHandler {
    let dispatcher = build_dispatcher(ContextConfig::with_timeout(timeout)).unwrap();
    ProtocolHandler::new(dispatcher)
}

fn handler() -> ProtocolHandler {
    handler_with_timeout(Duration::from_secs(5))
}

/// Build an MCP JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Build an initialize request.
fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

/// Send a JSON-RPC message through the handler and return the response.
async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

/// Send and unwrap the response.
async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

async fn call_tool(handler: &ProtocolHandler, id: i64, name: &str, arguments: Value) -> Value {
    send_unwrap(
        handler,
        mcp_request(id, "tools/call", json!({ "name": name, "arguments": arguments })),
    )
    .await
}

async fn read_resource(handler: &ProtocolHandler, id: i64, uri: &str) -> Value {
    send_unwrap(handler, mcp_request(id, "resources/read", json!({ "uri": uri }))).await
}

/// Parse the first text content of a resources/read response as JSON.
fn resource_json(resp: &Value) -> Value {
    let text = resp["result"]["contents"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("no text contents in {resp}"));
    serde_json::from_str(text).unwrap()
}

// ═══════════════════════════════════════════════════════
// PROTOCOL TESTS
// ═══════════════════════════════════════════════════════

/// Test 1: Malformed JSON never reaches the handler.
#[test]
fn test_01_malformed_json() {
    let err = framing::parse_message(r#"{"broken":"#).unwrap_err();
    assert_eq!(err.code(), -32700, "Should be PARSE_ERROR (-32700)");

    let rpc = err.to_json_rpc_error(RequestId::Null);
    assert_eq!(rpc.error.data.unwrap()["kind"], "parse_error");

    assert!(framing::parse_message("").is_err());
    assert!(framing::parse_message(r#"{"jsonrpc":"2.0","id":1,"method":"#).is_err());
}

/// Test 2: Wrong jsonrpc version is an invalid request.
#[tokio::test]
async fn test_02_wrong_jsonrpc_version() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        json!({ "jsonrpc": "1.0", "id": 2, "method": "ping" }),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32600);
    assert_eq!(resp["id"], 2);
}

/// Test 3: Unknown methods are reported as unsupported, not dropped.
#[tokio::test]
async fn test_03_unsupported_method() {
    let handler = handler();
    let resp = send_unwrap(&handler, mcp_request(3, "sampling/createMessage", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
    assert_eq!(resp["error"]["data"]["kind"], "unsupported_method");
}

/// Test 4: Handshake, ping, and notifications that expect no reply.
#[tokio::test]
async fn test_04_handshake() {
    let handler = handler();

    let resp = send_unwrap(&handler, init_request()).await;
    assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(resp["result"]["serverInfo"]["name"], "agentic-context-mcp");
    assert!(resp["result"]["capabilities"]["tools"].is_object());
    assert!(!handler.is_initialized().await);

    let none = send(
        &handler,
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    )
    .await;
    assert!(none.is_none(), "Notifications get no response");
    assert!(handler.is_initialized().await);

    let resp = send_unwrap(&handler, mcp_request(1, "ping", json!({}))).await;
    assert_eq!(resp["result"], json!({}));

    let none = send(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": { "requestId": 1, "reason": "user abort" }
        }),
    )
    .await;
    assert!(none.is_none());
}

/// Test 5: Initialize without params is a validation error.
#[tokio::test]
async fn test_05_initialize_requires_params() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        json!({ "jsonrpc": "2.0", "id": 5, "method": "initialize" }),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

// ═══════════════════════════════════════════════════════
// TOOL TESTS
// ═══════════════════════════════════════════════════════

/// Test 6: Listed tools carry a JSON schema derived from their parameters.
#[tokio::test]
async fn test_06_tools_list_schema() {
    let handler = handler();
    let resp = send_unwrap(&handler, mcp_request(6, "tools/list", json!({}))).await;
    let tools = resp["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(names, vec!["divide", "add", "wait"]);

    let divide = &tools[0];
    assert_eq!(divide["inputSchema"]["type"], "object");
    assert_eq!(divide["inputSchema"]["properties"]["a"]["type"], "number");
    assert_eq!(divide["inputSchema"]["required"], json!(["a", "b"]));
}

/// Test 7: Missing required argument is rejected with the field named.
#[tokio::test]
async fn test_07_missing_argument() {
    let handler = handler();
    let resp = call_tool(&handler, 7, "divide", json!({ "a": 1 })).await;
    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(resp["error"]["data"]["kind"], "validation");
    assert_eq!(resp["error"]["data"]["issues"][0]["field"], "b");
}

/// Test 8: Wrong argument type that cannot be coerced.
#[tokio::test]
async fn test_08_uncoercible_argument() {
    let handler = handler();
    let resp = call_tool(&handler, 8, "divide", json!({ "a": "ten", "b": [2] })).await;
    assert_eq!(resp["error"]["code"], -32602);
    let issues = resp["error"]["data"]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2, "Every offending field is reported: {resp}");
}

/// Test 9: Success payload, including coerced numeric strings.
#[tokio::test]
async fn test_09_divide_success() {
    let handler = handler();
    let resp = call_tool(&handler, 9, "divide", json!({ "a": 10, "b": 2 })).await;
    assert!(resp["result"].get("isError").is_none(), "got {resp}");
    assert_eq!(resp["result"]["content"][0]["text"], "5.0");

    let resp = call_tool(&handler, 10, "divide", json!({ "a": "10", "b": "4" })).await;
    assert_eq!(resp["result"]["content"][0]["text"], "2.5");
}

/// Test 10: Domain failures come back as a tool result the model can read.
#[tokio::test]
async fn test_10_divide_by_zero() {
    let handler = handler();
    let resp = call_tool(&handler, 11, "divide", json!({ "a": 5, "b": 0 })).await;
    assert!(resp.get("error").is_none(), "Not a protocol error: {resp}");
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(resp["result"]["structuredContent"]["kind"], "execution");
    assert!(resp["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("division by zero"));
}

/// Test 11: Unknown tool.
#[tokio::test]
async fn test_11_unknown_tool() {
    let handler = handler();
    let resp = call_tool(&handler, 12, "multiply", json!({ "a": 1, "b": 2 })).await;
    assert_eq!(resp["error"]["code"], -32803);
    assert_eq!(resp["error"]["data"]["kind"], "not_found");
}

/// Test 12: tools/call without params.
#[tokio::test]
async fn test_12_tools_call_without_params() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        json!({ "jsonrpc": "2.0", "id": 13, "method": "tools/call" }),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

// ═══════════════════════════════════════════════════════
// RESOURCE TESTS
// ═══════════════════════════════════════════════════════

/// Test 13: Static and templated resources are listed separately.
#[tokio::test]
async fn test_13_resource_listing() {
    let handler = handler();

    let resp = send_unwrap(&handler, mcp_request(14, "resources/list", json!({}))).await;
    let uris: Vec<&str> = resp["result"]["resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["uri"].as_str())
        .collect();
    assert_eq!(uris, vec!["config://app", "server://status", "user://admin/profile"]);

    let resp = send_unwrap(
        &handler,
        mcp_request(15, "resources/templates/list", json!({})),
    )
    .await;
    let templates: Vec<&str> = resp["result"]["resourceTemplates"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["uriTemplate"].as_str())
        .collect();
    assert_eq!(templates, vec!["user://{user_id}/profile", "file://docs/{name}"]);
}

/// Test 14: A literal URI shadows the template it would also match.
#[tokio::test]
async fn test_14_static_beats_template() {
    let handler = handler();

    let admin = resource_json(&read_resource(&handler, 16, "user://admin/profile").await);
    assert_eq!(admin["name"], "Administrator");

    let grace = resource_json(&read_resource(&handler, 17, "user://7/profile").await);
    assert_eq!(grace["name"], "Grace Hopper");
}

/// Test 15: Reads of side-effect-free resources are stable.
#[tokio::test]
async fn test_15_idempotent_reads() {
    let handler = handler();
    let first = read_resource(&handler, 18, "server://status").await;
    let second = read_resource(&handler, 19, "server://status").await;
    assert_eq!(first["result"], second["result"]);
}

/// Test 16: Unknown URI vs. a matched URI whose handler fails.
#[tokio::test]
async fn test_16_resource_errors() {
    let handler = handler();

    let resp = read_resource(&handler, 20, "nothing://here").await;
    assert_eq!(resp["error"]["code"], -32802);

    let resp = read_resource(&handler, 21, "user://99/profile").await;
    assert_eq!(resp["error"]["code"], -32806);
    assert_eq!(resp["error"]["data"]["kind"], "execution");

    // Extra segment: the template does not match.
    let resp = read_resource(&handler, 22, "user://7/profile/extra").await;
    assert_eq!(resp["error"]["code"], -32802);
}

/// Test 17: Binary resources are base64 encoded.
#[tokio::test]
async fn test_17_blob_resource() {
    let handler = handler();
    let resp = read_resource(&handler, 23, "file://docs/pixel.png").await;
    let contents = &resp["result"]["contents"][0];
    assert_eq!(contents["mimeType"], "image/png");
    assert!(contents["blob"].as_str().unwrap().starts_with("iVBORw0KGgo"));
    assert!(contents.get("text").is_none());

    let resp = read_resource(&handler, 24, "file://docs/readme.md").await;
    assert_eq!(resp["result"]["contents"][0]["mimeType"], "text/markdown");
}

/// Test 18: Subscribe is acknowledged for known URIs only.
#[tokio::test]
async fn test_18_subscribe() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        mcp_request(25, "resources/subscribe", json!({ "uri": "config://app" })),
    )
    .await;
    assert_eq!(resp["result"], json!({}));

    let resp = send_unwrap(
        &handler,
        mcp_request(26, "resources/subscribe", json!({ "uri": "nope://x" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32802);
}

// ═══════════════════════════════════════════════════════
// PROMPT TESTS
// ═══════════════════════════════════════════════════════

/// Test 19: Listed prompts describe their arguments.
#[tokio::test]
async fn test_19_prompts_list() {
    let handler = handler();
    let resp = send_unwrap(&handler, mcp_request(27, "prompts/list", json!({}))).await;
    let prompts = resp["result"]["prompts"].as_array().unwrap();
    assert_eq!(prompts[0]["name"], "review_code");
    assert_eq!(prompts[0]["arguments"][0]["name"], "code");
    assert_eq!(prompts[0]["arguments"][0]["required"], true);
    assert_eq!(prompts[0]["arguments"][1]["required"], false);
}

/// Test 20: Defaults are applied before the prompt handler runs.
#[tokio::test]
async fn test_20_prompt_defaults() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        mcp_request(
            28,
            "prompts/get",
            json!({ "name": "review_code", "arguments": { "code": "fn main() {}" } }),
        ),
    )
    .await;
    let messages = resp["result"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    let text = messages[1]["content"]["text"].as_str().unwrap();
    assert!(text.contains("```rust"), "got {text}");
}

/// Test 21: Embedded resources arrive already resolved.
#[tokio::test]
async fn test_21_prompt_embeds_resource() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        mcp_request(
            29,
            "prompts/get",
            json!({ "name": "profile_summary", "arguments": { "user_id": 1 } }),
        ),
    )
    .await;
    let messages = resp["result"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"]["type"], "resource");
    let resource = &messages[1]["content"]["resource"];
    assert_eq!(resource["uri"], "user://1/profile");
    assert!(resource["text"].as_str().unwrap().contains("Ada Lovelace"));
}

/// Test 22: An embed that cannot be read fails the whole expansion.
#[tokio::test]
async fn test_22_prompt_embed_failure() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        mcp_request(
            30,
            "prompts/get",
            json!({ "name": "profile_summary", "arguments": { "user_id": "404" } }),
        ),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32806);
    assert!(resp.get("result").is_none());
}

/// Test 23: Unknown prompt and missing prompt argument.
#[tokio::test]
async fn test_23_prompt_errors() {
    let handler = handler();
    let resp = send_unwrap(
        &handler,
        mcp_request(31, "prompts/get", json!({ "name": "haiku" })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32804);

    let resp = send_unwrap(
        &handler,
        mcp_request(32, "prompts/get", json!({ "name": "review_code", "arguments": {} })),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(resp["error"]["data"]["issues"][0]["field"], "code");
}

// ═══════════════════════════════════════════════════════
// CONCURRENCY & TIMEOUT TESTS
// ═══════════════════════════════════════════════════════

/// Test 24: A stalled tool times out and the server keeps serving.
#[tokio::test]
async fn test_24_timeout_then_recovery() {
    let handler = handler_with_timeout(Duration::from_millis(50));

    let resp = call_tool(&handler, 33, "wait", json!({ "millis": 5000 })).await;
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(resp["result"]["structuredContent"]["kind"], "timeout");

    let resp = call_tool(&handler, 34, "add", json!({ "a": 2, "b": 3 })).await;
    assert_eq!(resp["result"]["content"][0]["text"], "5.0");
}

/// Test 25: Concurrent calls each get their own answer.
#[tokio::test]
async fn test_25_concurrent_calls() {
    let handler = Arc::new(handler());

    let mut tasks = Vec::new();
    for i in 1..=20i64 {
        let handler = handler.clone();
        tasks.push(tokio::spawn(async move {
            let resp = call_tool(&handler, 100 + i, "add", json!({ "a": i, "b": i })).await;
            (i, resp)
        }));
    }

    for task in tasks {
        let (i, resp) = task.await.unwrap();
        assert_eq!(resp["id"], 100 + i);
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        let sum: f64 = text.parse().unwrap();
        assert_eq!(sum, (2 * i) as f64);
    }
}

/// Test 26: The handler can be driven from synchronous code.
#[test]
fn test_26_block_on_ping() {
    let resp = tokio_test::block_on(async {
        let handler = handler();
        send_unwrap(&handler, mcp_request(40, "ping", json!({}))).await
    });
    assert_eq!(resp["id"], 40);
    assert_eq!(resp["result"], json!({}));
}
