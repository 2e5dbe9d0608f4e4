// SPDX-License-Identifier: Apache-2.0
//!
//! The shapes `translate` produces: the agent runtime config serialised into
//! a `ConfigMap`, and the Kubernetes-style workload manifest around it.

use std::collections::HashMap;

use actl_config::{McpProtocol, Skill};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
    pub state_transition_history: bool,
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            streaming: true,
            push_notifications: false,
            state_transition_history: true,
        }
    }
}

/// The A2A agent card embedded in the runtime config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<Skill>,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
}

/// A group of MCP tools resolved to one connection descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMcpToolGroup {
    pub server_name: String,
    pub protocol: McpProtocol,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub timeout_secs: u64,
    pub tool_names: Vec<String>,
}

/// A nested agent-as-tool, fully translated (its own config is inlined so
/// the runtime can instantiate the whole sub-agent tree from one document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAgentTool {
    pub name: String,
    pub config: AgentConfigDoc,
}

/// The agent runtime configuration document: everything the agent process
/// needs at startup, independent of how it got there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfigDoc {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub model: String,
    pub env: Vec<actl_config::EnvVar>,
    pub card: AgentCard,
    pub mcp_tools: Vec<ResolvedMcpToolGroup>,
    pub agent_tools: Vec<SubAgentTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRequirements {
    pub requests_cpu: String,
    pub requests_memory: String,
    pub limits_cpu: String,
    pub limits_memory: String,
}

impl Default for ResourceRequirements {
    fn default() -> Self {
        Self {
            requests_cpu: "100m".to_string(),
            requests_memory: "256Mi".to_string(),
            limits_cpu: "1000m".to_string(),
            limits_memory: "1Gi".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountManifest {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMapManifest {
    pub name: String,
    pub namespace: String,
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub name: String,
    pub namespace: String,
    pub replicas: u32,
    pub resources: ResourceRequirements,
    pub readiness_probe_path: String,
    pub config_mount_path: String,
    pub config_map_name: String,
    pub service_account: String,
    pub pod_label_hash: String,
    pub env: Vec<actl_config::EnvVar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceManifest {
    pub name: String,
    pub namespace: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ManifestObject {
    ServiceAccount(ServiceAccountManifest),
    ConfigMap(ConfigMapManifest),
    Deployment(DeploymentManifest),
    Service(ServiceManifest),
}

/// The full result of translating one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub manifest: Vec<ManifestObject>,
    pub agent_config: AgentConfigDoc,
    pub config_hash: String,
}
