//! Error types and JSON-RPC error codes for the MCP server.

use serde_json::{json, Value};

use agentic_context::{ContextError, Namespace};

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
    pub const HANDLER_TIMEOUT: i32 = -32805;
    pub const EXECUTION_FAILED: i32 = -32806;

    /// Server: Unauthorized (missing or invalid bearer token).
    pub const UNAUTHORIZED: i32 = -32900;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// Errors raised by the registry, invoker, resolver or expander.
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unauthorized: missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::Transport(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::Unauthorized => UNAUTHORIZED,
            McpError::Context(e) => match e {
                ContextError::NotFound { namespace, .. } => match namespace {
                    Namespace::Tool => TOOL_NOT_FOUND,
                    Namespace::Resource => RESOURCE_NOT_FOUND,
                    Namespace::Prompt => PROMPT_NOT_FOUND,
                },
                ContextError::Validation { .. } => INVALID_PARAMS,
                ContextError::Execution { .. } => EXECUTION_FAILED,
                ContextError::Timeout { .. } => HANDLER_TIMEOUT,
                ContextError::DuplicateName { .. } => INTERNAL_ERROR,
                ContextError::UnsupportedMethod(_) => METHOD_NOT_FOUND,
            },
        }
    }

    /// Machine-readable kind carried in `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::ParseError(_) | McpError::Json(_) => "parse_error",
            McpError::InvalidRequest(_) => "invalid_request",
            McpError::InvalidParams(_) => "validation",
            McpError::InternalError(_) | McpError::Transport(_) | McpError::Io(_) => "internal",
            McpError::Unauthorized => "unauthorized",
            McpError::Context(e) => e.kind().as_str(),
        }
    }

    fn data(&self) -> Value {
        match self {
            McpError::Context(ContextError::Validation { issues, .. }) => json!({
                "kind": self.kind(),
                "issues": issues,
            }),
            _ => json!({ "kind": self.kind() }),
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data: Some(self.data()),
            },
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
