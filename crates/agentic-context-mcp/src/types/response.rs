//! MCP response types for tools, resources, and prompts.
//!
//! Also holds the conversions from core results to their wire shapes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use agentic_context::schema::to_json_schema;
use agentic_context::{
    InvocationResult, Message, MessageContent, PromptExpansion, PromptInfo, ResourceContents,
    ResourceInfo, ResourceRead, Role, ToolInfo,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "resource")]
    Resource { resource: ResourceContent },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(default, rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(
        default,
        rename = "structuredContent",
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<Value>,
}

impl From<InvocationResult> for ToolCallResult {
    fn from(result: InvocationResult) -> Self {
        match result {
            InvocationResult::Success { value } => {
                let text = match &value {
                    Value::String(s) => s.clone(),
                    other => serde_json::to_string_pretty(other).unwrap_or_else(|e| e.to_string()),
                };
                Self {
                    content: vec![ToolContent::Text { text }],
                    is_error: None,
                    structured_content: value.is_object().then_some(value),
                }
            }
            InvocationResult::Failure(failure) => Self {
                content: vec![ToolContent::Text {
                    text: failure.message.clone(),
                }],
                is_error: Some(true),
                structured_content: Some(json!({
                    "kind": failure.kind,
                    "message": failure.message,
                })),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl From<&ToolInfo> for ToolDefinition {
    fn from(info: &ToolInfo) -> Self {
        Self {
            name: info.name.clone(),
            description: info.description.clone(),
            input_schema: to_json_schema(&info.params),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

impl From<ResourceRead> for ResourceContent {
    fn from(read: ResourceRead) -> Self {
        let mime_type = Some(read.contents.mime_type().to_string());
        let (text, blob) = match read.contents {
            ResourceContents::Text { text, .. } => (Some(text), None),
            ResourceContents::Json { value } => (
                Some(serde_json::to_string_pretty(&value).unwrap_or_else(|e| e.to_string())),
                None,
            ),
            ResourceContents::Blob { data, .. } => (None, Some(BASE64.encode(data))),
        };
        Self {
            uri: read.uri,
            mime_type,
            text,
            blob,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<&ResourceInfo> for ResourceDefinition {
    fn from(info: &ResourceInfo) -> Self {
        Self {
            uri: info.uri.clone(),
            name: info.name.clone(),
            description: info.description.clone(),
            mime_type: info.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTemplateDefinition {
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<&ResourceInfo> for ResourceTemplateDefinition {
    fn from(info: &ResourceInfo) -> Self {
        Self {
            uri_template: info.uri.clone(),
            name: info.name.clone(),
            description: info.description.clone(),
            mime_type: info.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceListResult {
    pub resources: Vec<ResourceDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceTemplateListResult {
    #[serde(rename = "resourceTemplates")]
    pub resource_templates: Vec<ResourceTemplateDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

impl From<&PromptInfo> for PromptDefinition {
    fn from(info: &PromptInfo) -> Self {
        let arguments: Vec<PromptArgument> = info
            .params
            .iter()
            .map(|p| PromptArgument {
                name: p.name.clone(),
                description: p.description.clone(),
                required: p.required,
            })
            .collect();
        Self {
            name: info.name.clone(),
            description: info.description.clone(),
            arguments: (!arguments.is_empty()).then_some(arguments),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptListResult {
    pub prompts: Vec<PromptDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: ToolContent,
}

/// MCP only knows `user` and `assistant`; system text and attachments ride as `user`.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "assistant",
        Role::User | Role::System | Role::ResourceAttachment => "user",
    }
}

impl From<Message> for PromptMessage {
    fn from(message: Message) -> Self {
        let content = match message.content {
            MessageContent::Text { text } => ToolContent::Text { text },
            MessageContent::Resource { resource } => ToolContent::Resource {
                resource: resource.into(),
            },
        };
        Self {
            role: wire_role(message.role).to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptGetResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

impl From<PromptExpansion> for PromptGetResult {
    fn from(expansion: PromptExpansion) -> Self {
        Self {
            description: expansion.description,
            messages: expansion.messages.into_iter().map(Into::into).collect(),
        }
    }
}
