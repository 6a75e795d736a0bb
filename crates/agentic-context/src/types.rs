//! Core data types: descriptors, handlers, messages, and results.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, HandlerError};
use crate::schema::{Arguments, ParamSpec};
use crate::template::UriTemplate;

/// Boxed future returned by every handler.
pub type HandlerFuture<T> = Pin<Box<dyn Future<Output = Result<T, HandlerError>> + Send + 'static>>;

pub type ToolHandler = Arc<dyn Fn(Arguments) -> HandlerFuture<Value> + Send + Sync>;
pub type ResourceHandler = Arc<dyn Fn(ResourceRequest) -> HandlerFuture<ResourceContents> + Send + Sync>;
pub type PromptHandler = Arc<dyn Fn(Arguments) -> HandlerFuture<Vec<PromptMessage>> + Send + Sync>;

// ─────────────────────── tools ───────────────────────

/// Declared return shape of a tool, published alongside its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    Text,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Any,
}

/// Registration record binding a tool name to its schema and handler.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
    pub returns: ReturnType,
    pub handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
            returns: ReturnType::Any,
            handler: Arc::new(move |args| -> HandlerFuture<Value> { Box::pin(handler(args)) }),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_returns(mut self, returns: ReturnType) -> Self {
        self.returns = returns;
        self
    }

    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            params: self.params.clone(),
            returns: self.returns,
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Listing metadata for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
    pub returns: ReturnType,
}

/// Structured failure reported by a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of a tool call: a success payload or a failure, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success { value: Value },
    Failure(Failure),
}

impl InvocationResult {
    pub fn success(value: Value) -> Self {
        InvocationResult::Success { value }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        InvocationResult::Failure(Failure {
            kind,
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            InvocationResult::Success { value } => Some(value),
            InvocationResult::Failure(_) => None,
        }
    }

    pub fn failure_ref(&self) -> Option<&Failure> {
        match self {
            InvocationResult::Failure(f) => Some(f),
            InvocationResult::Success { .. } => None,
        }
    }
}

// ─────────────────────── resources ───────────────────────

/// What a resource handler receives: the concrete URI and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceRequest {
    pub uri: String,
    pub params: BTreeMap<String, String>,
}

impl ResourceRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Content returned by a resource read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceContents {
    Text { mime_type: String, text: String },
    Json { value: Value },
    Blob { mime_type: String, data: Vec<u8> },
}

impl ResourceContents {
    pub fn text(text: impl Into<String>) -> Self {
        ResourceContents::Text {
            mime_type: "text/plain".to_string(),
            text: text.into(),
        }
    }

    pub fn json(value: Value) -> Self {
        ResourceContents::Json { value }
    }

    pub fn blob(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        ResourceContents::Blob {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ResourceContents::Text { mime_type, .. } | ResourceContents::Blob { mime_type, .. } => {
                mime_type
            }
            ResourceContents::Json { .. } => "application/json",
        }
    }
}

/// Registration record binding a URI pattern to a handler.
#[derive(Clone)]
pub struct ResourceDescriptor {
    pub template: UriTemplate,
    pub name: String,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    /// Parameters merged under captured placeholder values on every read.
    pub static_params: BTreeMap<String, String>,
    pub side_effect_free: bool,
    pub handler: ResourceHandler,
}

impl ResourceDescriptor {
    pub fn new<F, Fut>(template: UriTemplate, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ResourceRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, HandlerError>> + Send + 'static,
    {
        Self {
            template,
            name: name.into(),
            description: None,
            mime_type: None,
            static_params: BTreeMap::new(),
            side_effect_free: true,
            handler: Arc::new(move |req| -> HandlerFuture<ResourceContents> {
                Box::pin(handler(req))
            }),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_static_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_params.insert(name.into(), value.into());
        self
    }

    pub fn with_side_effects(mut self) -> Self {
        self.side_effect_free = false;
        self
    }

    pub fn is_static(&self) -> bool {
        self.template.is_static()
    }

    pub fn info(&self) -> ResourceInfo {
        ResourceInfo {
            uri: self.template.as_str().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
            templated: !self.is_static(),
        }
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("uri", &self.template.as_str())
            .field("name", &self.name)
            .field("side_effect_free", &self.side_effect_free)
            .finish_non_exhaustive()
    }
}

/// Listing metadata for a resource; never produced by running a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Literal URI for static resources, the pattern for templated ones.
    pub uri: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub templated: bool,
}

/// Result of a resource read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRead {
    pub uri: String,
    pub contents: ResourceContents,
}

// ─────────────────────── prompts ───────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    Assistant,
    System,
    ResourceAttachment,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::ResourceAttachment => "resource-attachment",
        }
    }
}

/// Content produced by a prompt handler, before embedded references are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptContent {
    Text(String),
    /// A resource URI to be resolved and attached at expansion time.
    Embed(String),
}

/// A message as written by a prompt handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: PromptContent,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: PromptContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: PromptContent::Text(text.into()),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: PromptContent::Text(text.into()),
        }
    }

    pub fn embed(uri: impl Into<String>) -> Self {
        Self {
            role: Role::ResourceAttachment,
            content: PromptContent::Embed(uri.into()),
        }
    }
}

/// Content of an expanded message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    Resource { resource: ResourceRead },
}

/// An expanded, self-contained prompt message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text { text } => Some(text),
            MessageContent::Resource { .. } => None,
        }
    }
}

/// Registration record binding a prompt name to its schema and handler.
#[derive(Clone)]
pub struct PromptDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
    pub handler: PromptHandler,
}

impl PromptDescriptor {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<PromptMessage>, HandlerError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
            handler: Arc::new(move |args| -> HandlerFuture<Vec<PromptMessage>> {
                Box::pin(handler(args))
            }),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn info(&self) -> PromptInfo {
        PromptInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            params: self.params.clone(),
        }
    }
}

impl fmt::Debug for PromptDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Listing metadata for a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub params: Vec<ParamSpec>,
}

/// Result of expanding a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptExpansion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<Message>,
}
