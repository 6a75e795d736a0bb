//! Resource: config://app

use serde_json::json;

use agentic_context::{ContextResult, ResourceContents, ResourceDescriptor, UriTemplate};

use crate::types::{MCP_VERSION, SERVER_NAME, SERVER_VERSION};

pub fn descriptor() -> ContextResult<ResourceDescriptor> {
    Ok(ResourceDescriptor::new(
        UriTemplate::parse("config://app")?,
        "app_config",
        |_req| async {
            Ok(ResourceContents::json(json!({
                "server": SERVER_NAME,
                "version": SERVER_VERSION,
                "protocol": MCP_VERSION,
                "features": ["tools", "resources", "prompts"],
            })))
        },
    )
    .with_description("Static server configuration")
    .with_mime_type("application/json"))
}
