//! Prompt expansion with eager resolution of embedded resources.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::{ContextError, ContextResult};
use crate::exec::{run_bounded, ExecFailure};
use crate::registry::Registry;
use crate::resolver::Resolver;
use crate::schema;
use crate::types::{Message, MessageContent, PromptContent, PromptExpansion, Role};

#[derive(Debug, Clone)]
pub struct PromptExpander {
    registry: Arc<Registry>,
    resolver: Resolver,
    timeout: Duration,
}

impl PromptExpander {
    pub fn new(registry: Arc<Registry>, resolver: Resolver, timeout: Duration) -> Self {
        Self {
            registry,
            resolver,
            timeout,
        }
    }

    /// Expand a prompt into a self-contained, ordered message sequence.
    ///
    /// Every embedded resource reference is read before returning and comes
    /// back as a `resource-attachment` message. If any reference fails to
    /// resolve, the whole expansion fails.
    pub async fn get_prompt(&self, name: &str, arguments: Option<Value>) -> ContextResult<PromptExpansion> {
        let descriptor = self.registry.prompt(name)?;
        let args = schema::validate(name, &descriptor.params, arguments)?;

        let raw = match run_bounded(descriptor.handler.clone(), args, self.timeout).await {
            Ok(messages) => messages,
            Err(ExecFailure::Failed(message)) => {
                tracing::warn!("Prompt {name} failed: {message}");
                return Err(ContextError::Execution {
                    target: name.to_string(),
                    message,
                });
            }
            Err(ExecFailure::TimedOut(elapsed)) => {
                tracing::warn!("Prompt {name} timed out after {}ms", elapsed.as_millis());
                return Err(ContextError::Timeout {
                    target: name.to_string(),
                    elapsed,
                });
            }
        };

        let mut messages = Vec::with_capacity(raw.len());
        for message in raw {
            let expanded = match message.content {
                PromptContent::Text(text) => Message {
                    role: message.role,
                    content: MessageContent::Text { text },
                },
                PromptContent::Embed(uri) => {
                    let resource = self.resolver.read(&uri).await?;
                    Message {
                        role: Role::ResourceAttachment,
                        content: MessageContent::Resource { resource },
                    }
                }
            };
            messages.push(expanded);
        }

        tracing::debug!("Expanded prompt {name} into {} message(s)", messages.len());

        Ok(PromptExpansion {
            description: descriptor.description.clone(),
            messages,
        })
    }
}
