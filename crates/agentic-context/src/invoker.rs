//! Tool invocation: lookup, argument validation, bounded execution.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::{ContextResult, ErrorKind};
use crate::exec::{run_bounded, ExecFailure};
use crate::registry::Registry;
use crate::schema;
use crate::types::InvocationResult;

/// Invokes registered tools.
///
/// Lookup and validation errors come back as `Err` before any handler runs.
/// Anything that goes wrong inside the handler comes back as
/// `Ok(InvocationResult::Failure)` so the calling model can read it.
#[derive(Debug, Clone)]
pub struct Invoker {
    registry: Arc<Registry>,
    timeout: Duration,
}

impl Invoker {
    pub fn new(registry: Arc<Registry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub async fn invoke(&self, name: &str, arguments: Option<Value>) -> ContextResult<InvocationResult> {
        self.invoke_with_timeout(name, arguments, self.timeout).await
    }

    /// Invoke with a caller-supplied bound instead of the configured default.
    pub async fn invoke_with_timeout(
        &self,
        name: &str,
        arguments: Option<Value>,
        timeout: Duration,
    ) -> ContextResult<InvocationResult> {
        let descriptor = self.registry.tool(name)?;
        let args = schema::validate(name, &descriptor.params, arguments)?;

        tracing::debug!("Invoking tool {name} with {} argument(s)", args.len());
        match run_bounded(descriptor.handler.clone(), args, timeout).await {
            Ok(value) => Ok(InvocationResult::success(value)),
            Err(ExecFailure::Failed(message)) => {
                tracing::warn!("Tool {name} failed: {message}");
                Ok(InvocationResult::failure(ErrorKind::Execution, message))
            }
            Err(ExecFailure::TimedOut(elapsed)) => {
                tracing::warn!("Tool {name} timed out after {}ms", elapsed.as_millis());
                Ok(InvocationResult::failure(
                    ErrorKind::Timeout,
                    format!("{name} did not complete within {}ms", timeout.as_millis()),
                ))
            }
        }
    }
}
