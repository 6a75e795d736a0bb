//! Resources: user://{user_id}/profile and user://admin/profile

use std::collections::BTreeMap;

use serde_json::{json, Value};

use agentic_context::{
    ContextError, ContextResult, HandlerError, ResourceContents, ResourceDescriptor,
    ResourceRequest, UriTemplate,
};

pub const PROFILE_PATTERN: &str = "user://{user_id}/profile";

struct User {
    id: &'static str,
    name: &'static str,
    title: &'static str,
    languages: &'static [&'static str],
}

const DIRECTORY: &[User] = &[
    User {
        id: "1",
        name: "Ada Lovelace",
        title: "Analyst",
        languages: &["rust", "python"],
    },
    User {
        id: "2",
        name: "Alan Turing",
        title: "Researcher",
        languages: &["haskell"],
    },
    User {
        id: "7",
        name: "Grace Hopper",
        title: "Rear Admiral",
        languages: &["cobol", "rust"],
    },
];

fn profile_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "title": user.title,
        "languages": user.languages,
    })
}

async fn read_profile(req: ResourceRequest) -> Result<ResourceContents, HandlerError> {
    let id = req.param("user_id").unwrap_or_default();
    let user = DIRECTORY
        .iter()
        .find(|u| u.id == id)
        .ok_or_else(|| HandlerError::new(format!("no user with id '{id}'")))?;
    Ok(ResourceContents::json(profile_json(user)))
}

/// Concrete, percent-encoded profile URI for `user_id`.
pub fn profile_uri(user_id: &str) -> ContextResult<String> {
    let values = BTreeMap::from([("user_id".to_string(), user_id.to_string())]);
    UriTemplate::parse(PROFILE_PATTERN)?
        .expand(&values)
        .ok_or_else(|| ContextError::invalid(PROFILE_PATTERN, "user_id", "no value to expand"))
}

pub fn user_profile() -> ContextResult<ResourceDescriptor> {
    Ok(ResourceDescriptor::new(
        UriTemplate::parse(PROFILE_PATTERN)?,
        "user_profile",
        read_profile,
    )
    .with_description("Profile of a user in the directory")
    .with_mime_type("application/json"))
}

/// The administrator is not in the directory; this literal URI shadows the template.
pub fn admin_profile() -> ContextResult<ResourceDescriptor> {
    Ok(ResourceDescriptor::new(
        UriTemplate::parse("user://admin/profile")?,
        "admin_profile",
        |_req| async {
            Ok(ResourceContents::json(json!({
                "id": "admin",
                "name": "Administrator",
                "title": "Operator",
                "permissions": ["read", "write", "configure"],
            })))
        },
    )
    .with_description("Profile of the server administrator")
    .with_mime_type("application/json"))
}
