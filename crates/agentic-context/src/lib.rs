//! AgenticContext: core library for serving tools, resources, and prompts to AI clients.
//!
//! Build a [`Registry`] at startup, freeze it behind an `Arc`, and hand it to a
//! [`Dispatcher`] that routes `tools/call`, `resources/read`, `resources/list`
//! and `prompts/get` requests to the invoker, resolver and prompt expander.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod exec;
pub mod expander;
pub mod invoker;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod template;
pub mod types;

pub use config::{ContextConfig, DEFAULT_HANDLER_TIMEOUT};
pub use dispatcher::{Dispatcher, Request, Response, Route};
pub use error::{ContextError, ContextResult, ErrorKind, FieldIssue, HandlerError, Namespace};
pub use expander::PromptExpander;
pub use invoker::Invoker;
pub use registry::{DescriptorRef, Registry};
pub use resolver::{ResolvedResource, Resolver};
pub use schema::{Arguments, ParamSpec, ParamType};
pub use template::UriTemplate;
pub use types::*;
