//! Configuration loading and resolution.
//!
//! Every setting resolves the same way: explicit CLI value, then the
//! environment, then a built-in default.

use std::time::Duration;

use agentic_context::DEFAULT_HANDLER_TIMEOUT;

pub const TIMEOUT_ENV: &str = "ACTX_TIMEOUT_MS";
pub const TOKEN_ENV: &str = "AGENTIC_TOKEN";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3100";

/// Resolve the per-handler execution bound. Zero is never a valid bound.
pub fn resolve_timeout(explicit_ms: Option<u64>) -> Duration {
    if let Some(ms) = explicit_ms {
        if ms > 0 {
            return Duration::from_millis(ms);
        }
        tracing::warn!("Ignoring a zero timeout: expected a positive integer");
    }

    match std::env::var(TIMEOUT_ENV) {
        Ok(raw) => parse_millis(&raw).unwrap_or_else(|| {
            tracing::warn!("Ignoring {TIMEOUT_ENV}={raw:?}: expected a positive integer");
            DEFAULT_HANDLER_TIMEOUT
        }),
        Err(_) => DEFAULT_HANDLER_TIMEOUT,
    }
}

/// Resolve the bearer token for the HTTP transport. Empty values disable auth.
pub fn resolve_token(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .filter(|t| !t.trim().is_empty())
}

fn parse_millis(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
