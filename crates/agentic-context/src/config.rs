//! Runtime limits for handler execution.

use std::time::Duration;

/// Default bound on a single tool, resource, or prompt handler.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by the invoker, resolver and expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
    pub handler_timeout: Duration,
}

impl ContextConfig {
    pub fn with_timeout(handler_timeout: Duration) -> Self {
        Self { handler_timeout }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }
}
