//! AgenticContext MCP Server: tools, resources and prompts over the Model Context Protocol.

pub mod catalog;
pub mod config;
pub mod prompts;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod tools;
pub mod transport;
pub mod types;

pub use catalog::{build_dispatcher, build_registry};
pub use config::{resolve_timeout, resolve_token};
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;
