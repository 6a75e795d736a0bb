//! MCP capability negotiation during initialization.

use serde_json::Value;

use crate::types::{InitializeParams, InitializeResult, McpResult, MCP_VERSION, SUPPORTED_VERSIONS};

/// Stored client capabilities after negotiation.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: Value,
    pub protocol_version: Option<String>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Echo the client's revision when we speak it, otherwise offer ours.
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        let version = if SUPPORTED_VERSIONS.contains(&params.protocol_version.as_str()) {
            params.protocol_version.clone()
        } else {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
            MCP_VERSION.to_string()
        };

        self.client = params.capabilities;
        self.protocol_version = Some(version.clone());

        tracing::info!(
            "Initialized with client: {} v{} (protocol {version})",
            params.client_info.name,
            params.client_info.version
        );

        let mut result = InitializeResult::default_result();
        result.protocol_version = version;
        Ok(result)
    }

    pub fn mark_initialized(&mut self) -> McpResult<()> {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Implementation;

    fn params(version: &str) -> InitializeParams {
        InitializeParams {
            protocol_version: version.to_string(),
            capabilities: Value::Null,
            client_info: Implementation {
                name: "test".to_string(),
                version: "1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_known_version_is_echoed() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(params("2025-03-26")).unwrap();
        assert_eq!(result.protocol_version, "2025-03-26");
    }

    #[test]
    fn test_unknown_version_falls_back() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(params("1999-01-01")).unwrap();
        assert_eq!(result.protocol_version, MCP_VERSION);
        assert!(!caps.initialized);
        caps.mark_initialized().unwrap();
        assert!(caps.initialized);
    }
}
