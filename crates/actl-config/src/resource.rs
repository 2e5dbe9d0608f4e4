// SPDX-License-Identifier: Apache-2.0
//!
//! Declarative resource schemas: `Agent`, `ModelConfig`, `MCPServer`,
//! `RemoteMCPServer`, and the MCP-annotated `Service`. These are the desired
//! state the reconciler (C10) reads and the translator (C8) projects into
//! workload manifests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::provider::{Provider, ProviderSubConfig};

/// `namespace/name` identity shared by every resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

// ── ModelConfig ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub reference: ResourceRef,
    pub provider: Provider,
    pub model: String,
    pub api_key_secret_ref: Option<SecretRef>,
    pub provider_config: Option<ProviderSubConfig>,
    /// Set by the reconciler; not user-supplied. `true` once a finalizer has
    /// been attached.
    #[serde(default)]
    pub has_finalizer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelConfigError {
    #[error("provider {0:?} requires provider_config but none was given")]
    MissingProviderConfig(Provider),
    #[error("provider {0:?} does not take a provider_config but one was given")]
    UnexpectedProviderConfig(Provider),
}

impl ModelConfig {
    /// Invariant: provider-specific sub-config is non-null iff the provider
    /// requires it.
    pub fn validate(&self) -> Result<(), ModelConfigError> {
        let requires = self.provider.requires_sub_config();
        match (requires, &self.provider_config) {
            (true, None) => Err(ModelConfigError::MissingProviderConfig(self.provider)),
            (false, Some(_)) => Err(ModelConfigError::UnexpectedProviderConfig(self.provider)),
            _ => Ok(()),
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Inline,
    Remote,
    Workflow,
}

/// A single tool attached to an Agent. Forms a DAG when the variant is
/// `AgentTool` (validated acyclic, depth ≤ 10, by the translator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolReference {
    McpServerTool {
        target: ResourceRef,
        tool_names: Vec<String>,
    },
    AgentTool {
        target: ResourceRef,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct A2aConfig {
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineAgentSpec {
    pub model_config_ref: ResourceRef,
    pub system_message: String,
    #[serde(default)]
    pub tools: Vec<ToolReference>,
    #[serde(default)]
    pub a2a_config: A2aConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAgentSpec {
    pub discovery_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("agent type {0:?} requires exactly one of inline/remote spec to be set")]
    InconsistentSpec(AgentType),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub reference: ResourceRef,
    pub agent_type: AgentType,
    pub description: String,
    pub inline: Option<InlineAgentSpec>,
    pub remote: Option<RemoteAgentSpec>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub has_finalizer: bool,
}

impl Agent {
    /// Invariant: exactly one of inline/remote spec is set according to type.
    pub fn validate(&self) -> Result<(), AgentError> {
        let ok = match self.agent_type {
            AgentType::Inline => self.inline.is_some() && self.remote.is_none(),
            AgentType::Remote => self.remote.is_some() && self.inline.is_none(),
            // Workflow agents compose other agents purely through `inline.tools`
            // (AgentTool references); they carry an inline spec like Inline agents.
            AgentType::Workflow => self.inline.is_some() && self.remote.is_none(),
        };
        if ok {
            Ok(())
        } else {
            Err(AgentError::InconsistentSpec(self.agent_type))
        }
    }
}

// ── ToolServer / MCPServer / RemoteMCPServer / Service ────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolServerKind {
    McpServer,
    RemoteMcpServer,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpProtocol {
    Sse,
    StreamableHttp,
}

impl Default for McpProtocol {
    fn default() -> Self {
        McpProtocol::StreamableHttp
    }
}

/// A resolved connection descriptor for a remote MCP tool server, produced by
/// the translator (C8) from whichever of MCPServer / RemoteMCPServer /
/// MCP-annotated-Service the reference pointed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteMcpSpec {
    pub reference: ResourceRef,
    pub kind: ToolServerKind,
    pub protocol: McpProtocol,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub timeout_secs: u64,
}

/// Service annotations recognised when a plain `Service` is used as an MCP
/// tool-server source.
pub mod service_annotations {
    pub const MCP_PATH: &str = "kagent.dev/mcp-service-path";
    pub const MCP_PORT: &str = "kagent.dev/mcp-service-port";
    pub const MCP_PROTOCOL: &str = "kagent.dev/mcp-service-protocol";
    pub const DEFAULT_PATH: &str = "/mcp";
    pub const APP_PROTOCOL_MCP: &str = "mcp";
}

/// Minimal projection of a Kubernetes `Service` needed to resolve an
/// MCP-annotated service into a [`RemoteMcpSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePort {
    pub name: String,
    pub port: u16,
    pub app_protocol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResource {
    pub reference: ResourceRef,
    pub cluster_ip: String,
    pub ports: Vec<ServicePort>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

/// A standalone `MCPServer` resource: an explicit, always-MCP connection
/// descriptor (as opposed to a `Service` that merely carries MCP annotations).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerResource {
    pub reference: ResourceRef,
    pub protocol: McpProtocol,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub timeout_secs: u64,
}

/// A `RemoteMCPServer` resource: identical shape to [`McpServerResource`] but
/// a distinct group/kind for ownership and finalizer purposes.
pub type RemoteMcpServerResource = McpServerResource;

/// The three resource kinds a tool-server reference can resolve to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToolServerSource {
    McpServer(McpServerResource),
    RemoteMcpServer(RemoteMcpServerResource),
    Service(ServiceResource),
}

/// Resolve any of the three tool-server source kinds into a [`RemoteMcpSpec`].
pub fn resolve_tool_server_spec(source: &ToolServerSource) -> Option<RemoteMcpSpec> {
    match source {
        ToolServerSource::McpServer(r) => Some(RemoteMcpSpec {
            reference: r.reference.clone(),
            kind: ToolServerKind::McpServer,
            protocol: r.protocol,
            url: r.url.clone(),
            headers: r.headers.clone(),
            timeout_secs: r.timeout_secs,
        }),
        ToolServerSource::RemoteMcpServer(r) => Some(RemoteMcpSpec {
            reference: r.reference.clone(),
            kind: ToolServerKind::RemoteMcpServer,
            protocol: r.protocol,
            url: r.url.clone(),
            headers: r.headers.clone(),
            timeout_secs: r.timeout_secs,
        }),
        ToolServerSource::Service(svc) => resolve_service_mcp_spec(svc),
    }
}

/// Resolve an MCP-annotated `Service` into a [`RemoteMcpSpec`].
///
/// Port selection: the annotated port if given, else the first port whose
/// `app_protocol` is `"mcp"`.
pub fn resolve_service_mcp_spec(svc: &ServiceResource) -> Option<RemoteMcpSpec> {
    use service_annotations::*;

    let path = svc
        .annotations
        .get(MCP_PATH)
        .cloned()
        .unwrap_or_else(|| DEFAULT_PATH.to_string());

    let protocol = match svc.annotations.get(MCP_PROTOCOL).map(String::as_str) {
        Some("sse") => McpProtocol::Sse,
        Some("streamable-http") | None => McpProtocol::StreamableHttp,
        Some(_) => McpProtocol::StreamableHttp,
    };

    let port = if let Some(explicit) = svc.annotations.get(MCP_PORT).and_then(|p| p.parse::<u16>().ok()) {
        Some(explicit)
    } else {
        svc.ports
            .iter()
            .find(|p| p.app_protocol.as_deref() == Some(APP_PROTOCOL_MCP))
            .map(|p| p.port)
    }?;

    Some(RemoteMcpSpec {
        reference: svc.reference.clone(),
        kind: ToolServerKind::Service,
        protocol,
        url: format!("http://{}:{}{}", svc.cluster_ip, port, path),
        headers: HashMap::new(),
        timeout_secs: 30,
    })
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
