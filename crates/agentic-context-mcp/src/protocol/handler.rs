//! Main request dispatcher: receives JSON-RPC messages, routes to handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use agentic_context::{Dispatcher, Request, Response};

use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// The main protocol handler that dispatches incoming JSON-RPC messages.
///
/// Lifecycle methods are answered here; everything else goes to the
/// core [`Dispatcher`] and its result is reshaped for the wire.
pub struct ProtocolHandler {
    dispatcher: Arc<Dispatcher>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
}

impl ProtocolHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub async fn is_initialized(&self) -> bool {
        self.capabilities.lock().await.initialized
    }

    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            _ => {
                tracing::warn!("Received unexpected message type from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return serde_json::to_value(e.to_json_rpc_error(request.id)).unwrap_or_default();
        }

        let id = request.id.clone();
        let result = self.dispatch_request(request).await;

        match result {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)).unwrap_or_default(),
            Err(e) => {
                tracing::debug!("Request {id} failed: {e}");
                serde_json::to_value(e.to_json_rpc_error(id)).unwrap_or_default()
            }
        }
    }

    async fn dispatch_request(&self, request: JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params).await,
            "shutdown" => {
                tracing::info!("Shutdown requested");
                Ok(empty_object())
            }
            "ping" => Ok(empty_object()),

            "resources/subscribe" | "resources/unsubscribe" => {
                let params: ResourceSubscribeParams = request
                    .params
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| McpError::InvalidParams(e.to_string()))?
                    .ok_or_else(|| McpError::InvalidParams("uri is required".to_string()))?;
                // Resolve so unknown URIs are reported; nothing is pushed later.
                self.dispatcher.resolver().resolve(&params.uri)?;
                Ok(empty_object())
            }

            _ => {
                let response = self
                    .dispatcher
                    .handle(Request::new(request.method, request.params))
                    .await?;
                wire_result(response)
            }
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                let mut caps = self.capabilities.lock().await;
                if let Err(e) = caps.mark_initialized() {
                    tracing::error!("Failed to mark initialized: {e}");
                }
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                let params = notification
                    .params
                    .and_then(|p| serde_json::from_value::<CancelRequestParams>(p).ok());
                match params {
                    Some(p) => tracing::info!(
                        "Client cancelled request {}: {}",
                        p.request_id,
                        p.reason.as_deref().unwrap_or("no reason given")
                    ),
                    None => tracing::info!("Received cancellation notification"),
                }
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Initialize params required".to_string()))?;

        let mut caps = self.capabilities.lock().await;
        let result = caps.negotiate(init_params)?;

        to_value(result)
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn to_value(result: impl Serialize) -> McpResult<Value> {
    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

/// Reshape a core response into its MCP result object.
fn wire_result(response: Response) -> McpResult<Value> {
    match response {
        Response::ToolCall(result) => to_value(ToolCallResult::from(result)),
        Response::ToolList(tools) => to_value(ToolListResult {
            tools: tools.iter().map(ToolDefinition::from).collect(),
            next_cursor: None,
        }),
        Response::ResourceRead(read) => to_value(ReadResourceResult {
            contents: vec![read.into()],
        }),
        // Templated entries are listed separately under resources/templates/list.
        Response::ResourceList(resources) => to_value(ResourceListResult {
            resources: resources
                .iter()
                .filter(|r| !r.templated)
                .map(ResourceDefinition::from)
                .collect(),
            next_cursor: None,
        }),
        Response::ResourceTemplateList(templates) => to_value(ResourceTemplateListResult {
            resource_templates: templates.iter().map(ResourceTemplateDefinition::from).collect(),
            next_cursor: None,
        }),
        Response::PromptGet(expansion) => to_value(PromptGetResult::from(expansion)),
        Response::PromptList(prompts) => to_value(PromptListResult {
            prompts: prompts.iter().map(PromptDefinition::from).collect(),
            next_cursor: None,
        }),
    }
}
