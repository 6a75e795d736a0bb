//! Builds the registry and dispatcher this server ships with.

use std::sync::Arc;

use chrono::Utc;

use agentic_context::{ContextConfig, ContextResult, Dispatcher, Registry};

use crate::prompts::PromptCatalog;
use crate::resources::ResourceCatalog;
use crate::tools::ToolCatalog;

/// Register every bundled tool, resource and prompt.
pub fn build_registry() -> ContextResult<Registry> {
    let mut registry = Registry::new();
    ToolCatalog::register(&mut registry)?;
    ResourceCatalog::register(&mut registry, Utc::now())?;
    PromptCatalog::register(&mut registry)?;

    tracing::debug!(
        "Catalog ready: {} tool(s), {} resource(s), {} prompt(s)",
        registry.tool_count(),
        registry.resource_count(),
        registry.prompt_count()
    );
    Ok(registry)
}

/// Freeze the bundled registry behind a dispatcher.
pub fn build_dispatcher(config: ContextConfig) -> ContextResult<Arc<Dispatcher>> {
    let registry = Arc::new(build_registry()?);
    Ok(Arc::new(Dispatcher::new(registry, config)))
}
