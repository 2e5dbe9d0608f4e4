// SPDX-License-Identifier: Apache-2.0

mod loader;
mod provider;
mod resource;
mod schema;

pub use loader::load;
pub use provider::{derive_env_vars, EnvVar, Provider, ProviderSubConfig};
pub use resource::{
    resolve_service_mcp_spec, resolve_tool_server_spec, A2aConfig, Agent, AgentError, AgentType,
    InlineAgentSpec, McpProtocol, McpServerResource, ModelConfig, ModelConfigError,
    RemoteAgentSpec, RemoteMcpServerResource, RemoteMcpSpec, ResourceRef, SecretRef, ServicePort,
    ServiceResource, Skill, ToolReference, ToolServerKind, ToolServerSource, service_annotations,
};
pub use schema::{
    Config, ExecutorConfig, LoggingConfig, ReconcilerConfig, ResourceBundle, StoreBackend,
    ToolServerEntry,
};
