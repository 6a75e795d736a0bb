//! Method routing: one entry point in front of the invoker, resolver and expander.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ContextConfig;
use crate::error::{ContextError, ContextResult};
use crate::expander::PromptExpander;
use crate::invoker::Invoker;
use crate::registry::Registry;
use crate::resolver::Resolver;
use crate::types::{
    InvocationResult, PromptExpansion, PromptInfo, ResourceInfo, ResourceRead, ToolInfo,
};

/// Method discriminators understood by the dispatcher.
pub mod methods {
    pub const TOOLS_CALL: &str = "tools/call";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const RESOURCES_READ: &str = "resources/read";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const RESOURCES_TEMPLATES_LIST: &str = "resources/templates/list";
    pub const PROMPTS_GET: &str = "prompts/get";
    pub const PROMPTS_LIST: &str = "prompts/list";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ToolCall,
    ToolList,
    ResourceRead,
    ResourceList,
    ResourceTemplateList,
    PromptGet,
    PromptList,
}

/// The routing table, keyed by method name.
pub const ROUTES: &[(&str, Route)] = &[
    (methods::TOOLS_CALL, Route::ToolCall),
    (methods::TOOLS_LIST, Route::ToolList),
    (methods::RESOURCES_READ, Route::ResourceRead),
    (methods::RESOURCES_LIST, Route::ResourceList),
    (methods::RESOURCES_TEMPLATES_LIST, Route::ResourceTemplateList),
    (methods::PROMPTS_GET, Route::PromptGet),
    (methods::PROMPTS_LIST, Route::PromptList),
];

impl Route {
    pub fn for_method(method: &str) -> Option<Route> {
        ROUTES
            .iter()
            .find(|(name, _)| *name == method)
            .map(|(_, route)| *route)
    }
}

/// An incoming request: a method discriminator plus raw params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReadParams {
    uri: String,
}

/// What each route produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", content = "result", rename_all = "snake_case")]
pub enum Response {
    ToolCall(InvocationResult),
    ToolList(Vec<ToolInfo>),
    ResourceRead(ResourceRead),
    ResourceList(Vec<ResourceInfo>),
    ResourceTemplateList(Vec<ResourceInfo>),
    PromptGet(PromptExpansion),
    PromptList(Vec<PromptInfo>),
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    invoker: Invoker,
    resolver: Resolver,
    expander: PromptExpander,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, config: ContextConfig) -> Self {
        let timeout = config.handler_timeout;
        let invoker = Invoker::new(registry.clone(), timeout);
        let resolver = Resolver::new(registry.clone(), timeout);
        let expander = PromptExpander::new(registry.clone(), resolver.clone(), timeout);
        Self {
            registry,
            invoker,
            resolver,
            expander,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn expander(&self) -> &PromptExpander {
        &self.expander
    }

    pub async fn handle(&self, request: Request) -> ContextResult<Response> {
        let route = Route::for_method(&request.method)
            .ok_or_else(|| ContextError::UnsupportedMethod(request.method.clone()))?;

        tracing::debug!("Dispatching {} as {route:?}", request.method);

        match route {
            Route::ToolCall => {
                let p: CallParams = parse_params(&request)?;
                self.invoker
                    .invoke(&p.name, p.arguments)
                    .await
                    .map(Response::ToolCall)
            }
            Route::ToolList => Ok(Response::ToolList(self.registry.tool_infos())),
            Route::ResourceRead => {
                let p: ReadParams = parse_params(&request)?;
                self.resolver.read(&p.uri).await.map(Response::ResourceRead)
            }
            Route::ResourceList => Ok(Response::ResourceList(self.resolver.list())),
            Route::ResourceTemplateList => Ok(Response::ResourceTemplateList(
                self.resolver
                    .list()
                    .into_iter()
                    .filter(|r| r.templated)
                    .collect(),
            )),
            Route::PromptGet => {
                let p: CallParams = parse_params(&request)?;
                self.expander
                    .get_prompt(&p.name, p.arguments)
                    .await
                    .map(Response::PromptGet)
            }
            Route::PromptList => Ok(Response::PromptList(self.registry.prompt_infos())),
        }
    }
}

fn parse_params<T: DeserializeOwned>(request: &Request) -> ContextResult<T> {
    let params = request.params.clone().unwrap_or(Value::Null);
    if params.is_null() {
        return Err(ContextError::invalid(&request.method, "params", "params are required"));
    }
    serde_json::from_value(params)
        .map_err(|e| ContextError::invalid(&request.method, "params", e.to_string()))
}
