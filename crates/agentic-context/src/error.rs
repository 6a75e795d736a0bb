//! Error taxonomy shared by every component of the core library.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which registry namespace an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Tool,
    Resource,
    Prompt,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Tool => "tool",
            Namespace::Resource => "resource",
            Namespace::Prompt => "prompt",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable, machine-readable failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Execution,
    Timeout,
    DuplicateName,
    UnsupportedMethod,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Execution => "execution",
            ErrorKind::Timeout => "timeout",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::UnsupportedMethod => "unsupported_method",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single offending argument reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub problem: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// All errors surfaced by the registry, invoker, resolver, expander and dispatcher.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("{namespace} not found: {key}")]
    NotFound { namespace: Namespace, key: String },

    #[error("Invalid arguments for {target}: {}", join_issues(.issues))]
    Validation {
        target: String,
        issues: Vec<FieldIssue>,
    },

    #[error("Execution failed in {target}: {message}")]
    Execution { target: String, message: String },

    #[error("{target} timed out after {}ms", .elapsed.as_millis())]
    Timeout { target: String, elapsed: Duration },

    #[error("Duplicate {namespace} registration: {key}")]
    DuplicateName { namespace: Namespace, key: String },

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
}

impl ContextError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContextError::NotFound { .. } => ErrorKind::NotFound,
            ContextError::Validation { .. } => ErrorKind::Validation,
            ContextError::Execution { .. } => ErrorKind::Execution,
            ContextError::Timeout { .. } => ErrorKind::Timeout,
            ContextError::DuplicateName { .. } => ErrorKind::DuplicateName,
            ContextError::UnsupportedMethod(_) => ErrorKind::UnsupportedMethod,
        }
    }

    pub fn not_found(namespace: Namespace, key: impl Into<String>) -> Self {
        ContextError::NotFound {
            namespace,
            key: key.into(),
        }
    }

    /// Validation failure with a single offending field.
    pub fn invalid(target: impl Into<String>, field: impl Into<String>, problem: impl Into<String>) -> Self {
        ContextError::Validation {
            target: target.into(),
            issues: vec![FieldIssue::new(field, problem)],
        }
    }
}

/// Convenience result type.
pub type ContextResult<T> = Result<T, ContextError>;

/// Error returned by tool, resource and prompt handlers.
///
/// Handlers report domain failures ("division by zero") through this type;
/// the invoker turns them into structured failures instead of faults.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError(message.into())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError(message.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_are_stable() {
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
        assert_eq!(ErrorKind::UnsupportedMethod.to_string(), "unsupported_method");
        let json = serde_json::to_value(ErrorKind::DuplicateName).unwrap();
        assert_eq!(json, "duplicate_name");
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = ContextError::Validation {
            target: "divide".to_string(),
            issues: vec![
                FieldIssue::new("a", "required parameter is missing"),
                FieldIssue::new("b", "expected number, got string"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("divide"));
        assert!(text.contains("a: required parameter is missing"));
        assert!(text.contains("b: expected number"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_timeout_display() {
        let err = ContextError::Timeout {
            target: "slow".to_string(),
            elapsed: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "slow timed out after 250ms");
    }

    #[test]
    fn test_handler_error_conversion() {
        let err: HandlerError = "division by zero".into();
        assert_eq!(err.to_string(), "division by zero");
    }
}
