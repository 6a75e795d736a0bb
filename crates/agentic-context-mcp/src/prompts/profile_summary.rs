//! Prompt: profile_summary. Summarize a user, with their profile attached.

use agentic_context::{Arguments, HandlerError, ParamSpec, ParamType, PromptDescriptor, PromptMessage};

use crate::resources::profile::profile_uri;

pub fn descriptor() -> PromptDescriptor {
    PromptDescriptor::new("profile_summary", expand)
        .with_description("Summarize a user profile; the profile is attached to the prompt")
        .with_param(ParamSpec::required("user_id", ParamType::String).with_description("User to summarize"))
        .with_param(
            ParamSpec::optional("focus", ParamType::String)
                .with_description("Aspect to emphasize, e.g. skills"),
        )
}

async fn expand(args: Arguments) -> Result<Vec<PromptMessage>, HandlerError> {
    let user_id = args.str("user_id").unwrap_or_default();
    let uri = profile_uri(user_id).map_err(|e| HandlerError::new(e.to_string()))?;

    let mut messages = vec![
        PromptMessage::user(format!("Summarize the profile of user {user_id} in two sentences.")),
        PromptMessage::embed(uri),
    ];
    if let Some(focus) = args.str("focus") {
        messages.push(PromptMessage::user(format!("Emphasize their {focus}.")));
    }
    Ok(messages)
}
