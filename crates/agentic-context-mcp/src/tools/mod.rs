//! MCP tool implementations.

pub mod add;
pub mod divide;
pub mod registry;
pub mod wait;

pub use registry::ToolCatalog;
