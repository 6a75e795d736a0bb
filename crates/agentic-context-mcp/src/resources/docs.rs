//! Resource: file://docs/{name}
//!
//! A tiny embedded document store. Text files come back as text, anything
//! else as a blob.

use agentic_context::{
    ContextResult, HandlerError, ResourceContents, ResourceDescriptor, ResourceRequest, UriTemplate,
};

const README: &str = "# AgenticContext\n\n\
Tools, resources and prompts served over MCP.\n\n\
Try `tools/call` with `divide`, or `prompts/get` with `profile_summary`.\n";

const USAGE: &str = "Resources are addressed by URI. Templated URIs such as \
user://{user_id}/profile capture one path segment per placeholder.\n";

/// 1x1 transparent PNG.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

async fn read_doc(req: ResourceRequest) -> Result<ResourceContents, HandlerError> {
    let name = req.param("name").unwrap_or_default();
    match name {
        "readme.md" => Ok(ResourceContents::Text {
            mime_type: "text/markdown".to_string(),
            text: README.to_string(),
        }),
        "usage.txt" => Ok(ResourceContents::text(USAGE)),
        "pixel.png" => Ok(ResourceContents::blob("image/png", PIXEL_PNG.to_vec())),
        other => Err(HandlerError::new(format!("no document named '{other}'"))),
    }
}

pub fn descriptor() -> ContextResult<ResourceDescriptor> {
    Ok(ResourceDescriptor::new(UriTemplate::parse("file://docs/{name}")?, "docs", read_doc)
        .with_description("Bundled documents: readme.md, usage.txt, pixel.png"))
}
