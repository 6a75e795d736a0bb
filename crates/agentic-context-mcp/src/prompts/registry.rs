//! Prompt catalog served by this binary.

use agentic_context::{ContextResult, PromptDescriptor, Registry};

use super::{profile_summary, review_code};

pub struct PromptCatalog;

impl PromptCatalog {
    pub fn descriptors() -> Vec<PromptDescriptor> {
        vec![review_code::descriptor(), profile_summary::descriptor()]
    }

    pub fn register(registry: &mut Registry) -> ContextResult<()> {
        for descriptor in Self::descriptors() {
            registry.register_prompt(descriptor)?;
        }
        Ok(())
    }
}
