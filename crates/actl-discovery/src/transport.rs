// SPDX-License-Identifier: Apache-2.0
//!
//! The MCP connection seam. [`McpTransport`] is the collaborator boundary:
//! production code talks to a real server over SSE or streamable HTTP via
//! [`RmcpTransport`]; tests script responses against the trait directly.

use actl_config::{McpProtocol, RemoteMcpSpec};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::DiscoveryError;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[async_trait]
pub trait McpTransport: Send + Sync {
    async fn list_tools(&self, spec: &RemoteMcpSpec) -> Result<Vec<DiscoveredTool>, DiscoveryError>;
}

/// Connects to a remote MCP server over its declared protocol and lists its
/// tools. Each call opens a fresh connection; the caller owns retry/backoff
/// policy, not this transport.
pub struct RmcpTransport;

impl RmcpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RmcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl McpTransport for RmcpTransport {
    async fn list_tools(&self, spec: &RemoteMcpSpec) -> Result<Vec<DiscoveredTool>, DiscoveryError> {
        use rmcp::model::{ClientInfo, Implementation};
        use rmcp::serve_client;

        let client_info = ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: Default::default(),
            client_info: Implementation {
                name: "actl".into(),
                title: Some("actl MCP discovery client".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
        };

        let peer = match spec.protocol {
            McpProtocol::StreamableHttp => {
                use rmcp::transport::StreamableHttpClientTransport;
                use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;

                let mut config = StreamableHttpClientTransportConfig::with_uri(spec.url.as_str());
                if let Some(token) = spec.headers.get("authorization") {
                    config = config.auth_header(token.clone());
                }
                let transport = StreamableHttpClientTransport::from_config(config);
                let service = serve_client(client_info, transport)
                    .await
                    .map_err(|e| DiscoveryError::ConnectionFailed {
                        url: spec.url.clone(),
                        source: e.to_string(),
                    })?;
                service.peer().clone()
            }
            McpProtocol::Sse => {
                use rmcp::transport::sse_client::SseClientTransport;

                let transport = SseClientTransport::start(spec.url.as_str())
                    .await
                    .map_err(|e| DiscoveryError::ConnectionFailed {
                        url: spec.url.clone(),
                        source: e.to_string(),
                    })?;
                let service = serve_client(client_info, transport)
                    .await
                    .map_err(|e| DiscoveryError::ConnectionFailed {
                        url: spec.url.clone(),
                        source: e.to_string(),
                    })?;
                service.peer().clone()
            }
        };

        let tools = peer
            .list_all_tools()
            .await
            .map_err(|e| DiscoveryError::ListToolsFailed {
                url: spec.url.clone(),
                source: e.to_string(),
            })?;

        Ok(tools
            .into_iter()
            .map(|t| DiscoveredTool {
                name: t.name.to_string(),
                description: t.description.as_deref().unwrap_or("").to_string(),
                input_schema: serde_json::to_value(&t.input_schema).unwrap_or(Value::Null),
            })
            .collect())
    }
}
