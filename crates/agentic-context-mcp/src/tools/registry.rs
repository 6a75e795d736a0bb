//! Tool catalog served by this binary.

use agentic_context::{ContextResult, Registry, ToolDescriptor};

use super::{add, divide, wait};

pub struct ToolCatalog;

impl ToolCatalog {
    pub fn descriptors() -> Vec<ToolDescriptor> {
        vec![divide::descriptor(), add::descriptor(), wait::descriptor()]
    }

    pub fn register(registry: &mut Registry) -> ContextResult<()> {
        for descriptor in Self::descriptors() {
            registry.register_tool(descriptor)?;
        }
        Ok(())
    }
}
