//! MCP prompt implementations.

pub mod profile_summary;
pub mod registry;
pub mod review_code;

pub use registry::PromptCatalog;
