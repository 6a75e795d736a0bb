//! MCP resource implementations.

pub mod app_config;
pub mod docs;
pub mod profile;
pub mod registry;
pub mod status;

pub use registry::ResourceCatalog;
