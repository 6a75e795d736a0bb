//! JSON-RPC request validation before dispatch.

use serde_json::Value;

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

/// Validate that a JSON-RPC request is well-formed.
///
/// Params, when present, must be structured: an object, an array, or null.
pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "Expected jsonrpc version \"{JSONRPC_VERSION}\", got \"{}\"",
            request.jsonrpc
        )));
    }

    if request.method.trim().is_empty() {
        return Err(McpError::InvalidRequest(
            "Method name must not be empty".to_string(),
        ));
    }

    match &request.params {
        None | Some(Value::Null | Value::Object(_) | Value::Array(_)) => Ok(()),
        Some(_) => Err(McpError::InvalidRequest(format!(
            "params for {} must be an object or array",
            request.method
        ))),
    }
}
