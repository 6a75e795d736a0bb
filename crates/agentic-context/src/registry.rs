//! Registry of tools, resources and prompts.
//!
//! Populated through `&mut Registry` at startup, then shared read-only
//! behind an `Arc` while serving.

use std::collections::HashMap;

use crate::error::{ContextError, ContextResult, Namespace};
use crate::types::{
    PromptDescriptor, PromptInfo, ResourceDescriptor, ResourceInfo, ToolDescriptor, ToolInfo,
};

/// A borrowed descriptor from any namespace.
#[derive(Debug, Clone, Copy)]
pub enum DescriptorRef<'a> {
    Tool(&'a ToolDescriptor),
    Resource(&'a ResourceDescriptor),
    Prompt(&'a PromptDescriptor),
}

#[derive(Debug, Default)]
pub struct Registry {
    tools: HashMap<String, ToolDescriptor>,
    tool_order: Vec<String>,

    /// Resources in registration order; indices below point into this.
    resources: Vec<ResourceDescriptor>,
    static_index: HashMap<String, usize>,
    templated: Vec<usize>,
    resource_shapes: HashMap<String, usize>,

    prompts: HashMap<String, PromptDescriptor>,
    prompt_order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool(&mut self, descriptor: ToolDescriptor) -> ContextResult<()> {
        if self.tools.contains_key(&descriptor.name) {
            return Err(ContextError::DuplicateName {
                namespace: Namespace::Tool,
                key: descriptor.name,
            });
        }
        tracing::debug!("Registered tool {}", descriptor.name);
        self.tool_order.push(descriptor.name.clone());
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Register a resource. Patterns with the same literal/placeholder shape
    /// collide even when their placeholder names differ.
    pub fn register_resource(&mut self, descriptor: ResourceDescriptor) -> ContextResult<()> {
        let shape = descriptor.template.shape();
        if self.resource_shapes.contains_key(&shape) {
            return Err(ContextError::DuplicateName {
                namespace: Namespace::Resource,
                key: descriptor.template.as_str().to_string(),
            });
        }

        let idx = self.resources.len();
        if descriptor.is_static() {
            self.static_index
                .insert(descriptor.template.as_str().to_string(), idx);
        } else {
            self.templated.push(idx);
        }
        self.resource_shapes.insert(shape, idx);
        tracing::debug!("Registered resource {}", descriptor.template);
        self.resources.push(descriptor);
        Ok(())
    }

    pub fn register_prompt(&mut self, descriptor: PromptDescriptor) -> ContextResult<()> {
        if self.prompts.contains_key(&descriptor.name) {
            return Err(ContextError::DuplicateName {
                namespace: Namespace::Prompt,
                key: descriptor.name,
            });
        }
        tracing::debug!("Registered prompt {}", descriptor.name);
        self.prompt_order.push(descriptor.name.clone());
        self.prompts.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by namespace and key (tool name, resource
    /// pattern, or prompt name).
    pub fn lookup(&self, namespace: Namespace, key: &str) -> ContextResult<DescriptorRef<'_>> {
        match namespace {
            Namespace::Tool => self.tool(key).map(DescriptorRef::Tool),
            Namespace::Resource => self.resource_pattern(key).map(DescriptorRef::Resource),
            Namespace::Prompt => self.prompt(key).map(DescriptorRef::Prompt),
        }
    }

    pub fn tool(&self, name: &str) -> ContextResult<&ToolDescriptor> {
        self.tools
            .get(name)
            .ok_or_else(|| ContextError::not_found(Namespace::Tool, name))
    }

    pub fn prompt(&self, name: &str) -> ContextResult<&PromptDescriptor> {
        self.prompts
            .get(name)
            .ok_or_else(|| ContextError::not_found(Namespace::Prompt, name))
    }

    /// Find a resource by its registered pattern text (not by a concrete URI).
    pub fn resource_pattern(&self, pattern: &str) -> ContextResult<&ResourceDescriptor> {
        self.resources
            .iter()
            .find(|r| r.template.as_str() == pattern)
            .ok_or_else(|| ContextError::not_found(Namespace::Resource, pattern))
    }

    /// Exact lookup among static resources.
    pub fn static_resource(&self, uri: &str) -> Option<&ResourceDescriptor> {
        self.static_index.get(uri).map(|&idx| &self.resources[idx])
    }

    /// Templated resources in registration order.
    pub fn templated_resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.templated.iter().map(|&idx| &self.resources[idx])
    }

    /// Every resource in registration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.iter()
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tool_order.iter().filter_map(|name| self.tools.get(name))
    }

    pub fn prompts(&self) -> impl Iterator<Item = &PromptDescriptor> {
        self.prompt_order
            .iter()
            .filter_map(|name| self.prompts.get(name))
    }

    pub fn tool_infos(&self) -> Vec<ToolInfo> {
        self.tools().map(ToolDescriptor::info).collect()
    }

    pub fn resource_infos(&self) -> Vec<ResourceInfo> {
        self.resources().map(ResourceDescriptor::info).collect()
    }

    pub fn prompt_infos(&self) -> Vec<PromptInfo> {
        self.prompts().map(PromptDescriptor::info).collect()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }
}
