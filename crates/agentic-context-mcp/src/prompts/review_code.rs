//! Prompt: review_code. Ask for a focused code review.

use serde_json::json;

use agentic_context::{Arguments, HandlerError, ParamSpec, ParamType, PromptDescriptor, PromptMessage};

pub fn descriptor() -> PromptDescriptor {
    PromptDescriptor::new("review_code", expand)
        .with_description("Review a snippet of code for bugs and style")
        .with_param(ParamSpec::required("code", ParamType::String).with_description("Code to review"))
        .with_param(
            ParamSpec::optional("language", ParamType::String)
                .with_description("Language of the snippet")
                .with_default(json!("rust")),
        )
}

async fn expand(args: Arguments) -> Result<Vec<PromptMessage>, HandlerError> {
    let code = args.str("code").unwrap_or_default();
    let language = args.str("language").unwrap_or("rust");

    Ok(vec![
        PromptMessage::system(format!(
            "You are a careful {language} reviewer. Point out bugs first, then style."
        )),
        PromptMessage::user(format!(
            "Please review this {language} code:\n\n```{language}\n{code}\n```"
        )),
    ])
}
