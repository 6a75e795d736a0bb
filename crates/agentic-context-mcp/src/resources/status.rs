//! Resource: server://status

use chrono::{DateTime, Utc};
use serde_json::json;

use agentic_context::{ContextResult, ResourceContents, ResourceDescriptor, UriTemplate};

use crate::types::SERVER_VERSION;

/// `started_at` is fixed when the catalog is built, so reads stay stable.
pub fn descriptor(started_at: DateTime<Utc>) -> ContextResult<ResourceDescriptor> {
    Ok(ResourceDescriptor::new(
        UriTemplate::parse("server://status")?,
        "server_status",
        move |_req| async move {
            Ok(ResourceContents::json(json!({
                "status": "running",
                "version": SERVER_VERSION,
                "started_at": started_at.to_rfc3339(),
            })))
        },
    )
    .with_description("When this server process started")
    .with_mime_type("application/json"))
}
