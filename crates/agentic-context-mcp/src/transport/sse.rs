//! HTTP transport: JSON-RPC over POST /mcp, bearer-token auth, and /health.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub token: Option<String>,
    pub handler: Arc<ProtocolHandler>,
}

/// HTTP transport for web-based MCP clients.
pub struct SseTransport {
    state: Arc<ServerState>,
}

impl SseTransport {
    /// Create an unauthenticated transport.
    pub fn new(handler: ProtocolHandler) -> Self {
        Self::with_token(handler, None)
    }

    /// Create a transport that requires `Authorization: Bearer <token>` on /mcp.
    pub fn with_token(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                token,
                handler: Arc::new(handler),
            }),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(cors))
            .with_state(state)
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Auth middleware: checks Bearer token if configured.
/// /health is handled by a separate route that bypasses this layer.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::warn!("Rejected request without a valid bearer token");
            let body = McpError::Unauthorized.to_json_rpc_error(RequestId::Null);
            return (StatusCode::UNAUTHORIZED, AxumJson(body)).into_response();
        }
    }

    next.run(request).await
}

/// The body is taken raw so malformed JSON, bad UTF-8 or a missing
/// content type still get a JSON-RPC parse error instead of axum's text reply.
async fn handle_request(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let msg = match framing::decode_line(&body) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Parse error: {e}");
            let err = e.to_json_rpc_error(RequestId::Null);
            return (StatusCode::BAD_REQUEST, AxumJson(err)).into_response();
        }
    };

    match state.handler.handle_message(msg).await {
        Some(response) => AxumJson(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check endpoint: no auth required.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<serde_json::Value> {
    let registry = state.handler.dispatcher().registry();
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": registry.tool_count(),
        "resources": registry.resource_count(),
        "prompts": registry.prompt_count(),
    }))
}
